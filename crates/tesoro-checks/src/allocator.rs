use crate::checkbook::Checkbook;
use crate::error::{CheckError, Result};

/// Result of a number allocation: the allocated number and the checkbook
/// with its cursor advanced by one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub checkbook: Checkbook,
    pub number: u64,
}

/// Sequential number allocator for own checkbooks.
///
/// Pure: the caller persists the returned checkbook with a compare-and-swap
/// on its version so that two issuances never observe the same cursor.
pub struct NumberAllocator;

impl NumberAllocator {
    pub fn allocate_next(checkbook: &Checkbook) -> Result<Allocation> {
        if !checkbook.is_own() {
            return Err(CheckError::NotApplicable {
                checkbook: checkbook.id,
                kind: checkbook.kind,
            });
        }
        if !checkbook.active {
            return Err(CheckError::Inactive {
                checkbook: checkbook.id,
            });
        }
        checkbook.validate()?;

        let (_, range_to, next) = checkbook.numbering()?;
        if next > range_to {
            tracing::warn!(checkbook = %checkbook.id, next, range_to, "checkbook range exhausted");
            return Err(CheckError::RangeExhausted {
                checkbook: checkbook.id,
                next,
                range_to,
            });
        }

        let advanced = Checkbook {
            next_number: Some(next + 1),
            ..checkbook.clone()
        };

        tracing::debug!(checkbook = %checkbook.id, number = next, "allocated check number");
        Ok(Allocation {
            checkbook: advanced,
            number: next,
        })
    }
}
