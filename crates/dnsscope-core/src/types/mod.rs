mod analysis;
mod envelope;
mod health;
mod records;
mod report;
mod security;

pub use analysis::*;
pub use envelope::*;
pub use health::*;
pub use records::*;
pub use report::*;
pub use security::*;
