//! Educational features: explanations of what each probe does.

use colored::Colorize;
use std::fmt::{self, Write};

use crate::output::OutputFormat;

/// Command explanation builder.
pub struct Explain {
    description: String,
    probes: Vec<String>,
    what_happens: Vec<String>,
    caveat: Option<String>,
    learn_more: Vec<String>,
}

impl Explain {
    fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            probes: Vec::new(),
            what_happens: Vec::new(),
            caveat: None,
            learn_more: Vec::new(),
        }
    }

    fn probe(mut self, probe: &str) -> Self {
        self.probes.push(probe.to_string());
        self
    }

    fn step(mut self, step: &str) -> Self {
        self.what_happens.push(step.to_string());
        self
    }

    fn caveat(mut self, caveat: &str) -> Self {
        self.caveat = Some(caveat.to_string());
        self
    }

    fn rfc(mut self, number: u16) -> Self {
        self.learn_more
            .push(format!("https://www.rfc-editor.org/rfc/rfc{number}"));
        self
    }

    /// Print the explanation; stderr for machine-readable formats so stdout stays parseable.
    pub fn print(&self, format: OutputFormat) {
        let text = self.render();
        if format == OutputFormat::Pretty {
            print!("{text}");
        } else {
            eprint!("{text}");
        }
    }

    /// The explanation as display text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut impl Write) -> fmt::Result {
        writeln!(out)?;
        writeln!(out, "{}", "=== What This Does ===".bold().cyan())?;
        writeln!(out, "{}", self.description)?;
        writeln!(out)?;

        if !self.what_happens.is_empty() {
            writeln!(out, "{}", "How it works:".bold())?;
            for (i, step) in self.what_happens.iter().enumerate() {
                writeln!(out, "  {}. {}", i + 1, step)?;
            }
            writeln!(out)?;
        }

        if !self.probes.is_empty() {
            writeln!(out, "{}", "Network activity:".bold())?;
            for probe in &self.probes {
                writeln!(out, "  - {}", probe.dimmed())?;
            }
        }

        if let Some(caveat) = &self.caveat {
            writeln!(out)?;
            writeln!(out, "{} {}", "Note:".bold().yellow(), caveat)?;
        }

        if !self.learn_more.is_empty() {
            writeln!(out)?;
            for url in &self.learn_more {
                writeln!(out, "{} {}", "Learn more:".bold(), url.cyan().underline())?;
            }
        }

        writeln!(out)?;
        writeln!(out, "{}", "=== Results ===".bold().cyan())?;
        writeln!(out)
    }

    // ========================================================================
    // Factory methods for each command
    // ========================================================================

    pub fn analyze(domain: &str) -> Self {
        Self::new(&format!(
            "Runs every check against {domain} concurrently and merges the results into one report."
        ))
        .step("Record collection, security assessment, resolver health, wildcard detection and trace analysis start together")
        .step("Each probe fails on its own; a failure becomes an error field, never an aborted run")
        .step("Only an invalid domain name stops the analysis before any query is sent")
        .probe("system resolver: 8 record types, PTR lookups, 3 SRV names, 3 random subdomains")
        .probe("4 public resolvers: one A query each for health, one for consistency")
        .probe("dig: DNSSEC, CAA, AXFR and +trace queries")
        .probe("one HTTPS request to the DNS-over-HTTPS endpoint")
        .caveat("Use --deadline to bound the whole run; stalled checks are reported as unavailable.")
    }

    pub fn records(domain: &str) -> Self {
        Self::new(&format!("Resolves every supported record type for {domain}."))
            .step("A, AAAA, CNAME, MX, TXT, NS, SOA and SRV are queried concurrently")
            .step("Each A address gets a best-effort reverse (PTR) lookup")
            .step("SRV is looked up under _sip._tcp, _xmpp-server._tcp and _xmpp-client._tcp")
            .step("TXT records are bucketed into SPF, DMARC, DKIM, verification and other")
            .probe("system resolver only")
            .rfc(1035)
            .rfc(2782)
    }

    pub fn security(domain: &str) -> Self {
        Self::new(&format!("Assesses the DNS security posture of {domain}."))
            .step("DNSSEC: looks for RRSIG records or the AD flag in a +dnssec query")
            .step("DoH: asks a public DNS-over-HTTPS endpoint for the A record")
            .step("CAA: lists which certificate authorities may issue for the domain")
            .step("Zone transfer: attempts AXFR; a completed transfer is a High finding")
            .step("Consistency: compares A answers from four public resolvers")
            .probe("dig: +dnssec, CAA and AXFR queries")
            .probe("HTTPS GET with Accept: application/dns-json")
            .caveat("If dig cannot run, the zone transfer check reports no finding rather than a failure. DoT is not probed.")
            .rfc(4033)
            .rfc(8659)
            .rfc(8484)
    }

    pub fn health(domain: &str) -> Self {
        Self::new(&format!(
            "Measures how fast public resolvers answer for {domain}."
        ))
        .step("Sends one A query to Google, Cloudflare, Quad9 and OpenDNS at the same time")
        .step("A resolver that does not answer within 5 seconds counts as failed")
        .step("Average latency is rated Excellent (<50ms), Good (<100ms), Fair (<200ms) or Poor")
        .probe("4 UDP queries to port 53")
        .caveat("No performance block is shown when every resolver fails.")
    }

    pub fn wildcard(domain: &str) -> Self {
        Self::new(&format!(
            "Checks whether {domain} answers for subdomains that should not exist."
        ))
        .step("Generates three random labels prefixed random-, test- and nonexistent-")
        .step("Resolves all three concurrently")
        .step("Confidence is simply resolved / 3, not a statistical measure")
        .probe("3 A queries through the system resolver")
        .caveat("Wildcard zones make brute-force subdomain enumeration report false positives.")
    }

    pub fn trace(domain: &str) -> Self {
        Self::new(&format!(
            "Follows the delegation chain for {domain} from the root and analyzes the answers."
        ))
        .step("Runs dig +trace +additional")
        .step("Collects response codes from status: tokens")
        .step("Collects TTLs and rates their average: <300s very low, <3600s low, <86400s standard, else high")
        .step("Extracts records from any AUTHORITY SECTION")
        .probe("dig: iterative queries from the root servers down")
    }
}
