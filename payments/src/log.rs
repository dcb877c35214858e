//! Append-only payment log.

use serde::{Deserialize, Serialize};
use svote_types::{DemocHash, Timestamp, Wei};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLogEntry {
    pub democ: DemocHash,
    /// Granted by an operator or a free extension rather than bought.
    pub is_free_grant: bool,
    pub seconds: u64,
    pub amount: Wei,
    pub at: Timestamp,
    /// Free-form operator note, empty for purchases.
    pub reference: Vec<u8>,
}
