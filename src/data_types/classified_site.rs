
use crate::data_types::classification::{Classification, Outcome};

/// One row of the aggregation table: the classified result for a compared site.
/// Rows are produced once per compared site and never modified afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClassifiedSite {
    /// Identifier for the compared site, unique within a run
    id: u64,
    /// Classification for the pipeline A record
    classification_a: Classification,
    /// Classification for the pipeline B record
    classification_b: Classification,
    /// The joint outcome for the pair
    outcome: Outcome
}

impl ClassifiedSite {
    /// Constructor
    pub fn new(id: u64, classification_a: Classification, classification_b: Classification, outcome: Outcome) -> Self {
        Self {
            id, classification_a, classification_b, outcome
        }
    }

    // getters
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn classification_a(&self) -> Classification {
        self.classification_a
    }

    pub fn classification_b(&self) -> Classification {
        self.classification_b
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
}
