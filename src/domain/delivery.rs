//! Delivery notifications
//!
//! A delivery says that a request became available at a given time. It only
//! exists to enumerate the request identifiers inside a cutoff window.

use crate::domain::ids::RequestId;
use serde::{Deserialize, Serialize};

/// One entry of the `getDeliveries` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    /// Delivery time in epoch milliseconds
    #[serde(default)]
    pub delivery_date: i64,

    /// Request that was delivered
    pub request: RequestId,
}

impl Delivery {
    /// Create a new delivery
    pub fn new(request: RequestId, delivery_date: i64) -> Self {
        Self {
            delivery_date,
            request,
        }
    }
}
