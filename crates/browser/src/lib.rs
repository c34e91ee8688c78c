pub mod driver;
pub mod resolver;
pub mod snapshot;

pub use driver::{BrowserDriver, CliDriver, SnapshotOptions};
pub use resolver::{find_element, find_element_with_fallback, Target};
pub use snapshot::{parse_snapshot, ParsedElement};
