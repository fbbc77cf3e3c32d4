use serde::{Deserialize, Serialize};

use crate::SequenceNumber;

/// A message as received from the queue transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sequence_number: SequenceNumber,
    pub body: String,
}

impl Message {
    pub fn new(sequence_number: SequenceNumber, body: impl Into<String>) -> Self {
        Self {
            sequence_number,
            body: body.into(),
        }
    }
}
