//! Logistics service requests.

use serde::{Deserialize, Serialize};

use crate::domain::mutation::{remove_row, row_mut};
use crate::domain::{CollectionDocument, EditKind, Mutation, MutationError};

/// One service request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceRequest {
    /// Filing date.
    pub date: String,
    /// Request number.
    pub request_number: String,
    /// Requester.
    pub requested_by: String,
    /// Requesting department.
    pub department: String,
    /// Kind of service.
    pub service_type: String,
    /// Priority label.
    pub priority: String,
    /// What is needed.
    pub description: String,
    /// Where.
    pub location: String,
    /// Assigned technician.
    pub technician: String,
    /// Progress label.
    pub status: String,
    /// Completion date.
    pub completion_date: String,
    /// Free remarks.
    pub remarks: String,
}

/// The `service-requests` document: a top-level array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRequests(pub Vec<ServiceRequest>);

impl CollectionDocument for ServiceRequests {
    const NAME: &'static str = "service-requests";
    const FILE_NAME: &'static str = "servicerequest.json";
}

/// Edits to the request table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRequestMutation {
    /// File a request.
    File(ServiceRequest),
    /// Replace a request after editing its row.
    Amend {
        /// Row index.
        index: usize,
        /// Edited request.
        request: ServiceRequest,
    },
    /// Remove a request.
    Withdraw {
        /// Row index.
        index: usize,
    },
}

impl Mutation<ServiceRequests> for ServiceRequestMutation {
    fn kind(&self) -> EditKind {
        match self {
            Self::File(_) | Self::Withdraw { .. } => EditKind::Structural,
            Self::Amend { .. } => EditKind::Field,
        }
    }

    fn apply(self, document: &mut ServiceRequests) -> Result<(), MutationError> {
        match self {
            Self::File(request) => {
                let number = request.request_number.trim();
                if !number.is_empty()
                    && document
                        .0
                        .iter()
                        .any(|filed| filed.request_number.trim() == number)
                {
                    return Err(MutationError::Duplicate {
                        what: "service request",
                        key: number.to_owned(),
                    });
                }
                document.0.push(request);
            }
            Self::Amend { index, request } => *row_mut(&mut document.0, index)? = request,
            Self::Withdraw { index } => {
                remove_row(&mut document.0, index)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(number: &str) -> ServiceRequest {
        ServiceRequest {
            request_number: number.to_owned(),
            requested_by: "Ana".to_owned(),
            status: "Open".to_owned(),
            ..ServiceRequest::default()
        }
    }

    #[rstest]
    fn request_numbers_are_unique() {
        let mut requests = ServiceRequests(vec![request("SR-1")]);
        let error = ServiceRequestMutation::File(request(" SR-1 "))
            .apply(&mut requests)
            .expect_err("number taken");
        assert_eq!(
            error,
            MutationError::Duplicate {
                what: "service request",
                key: "SR-1".to_owned(),
            }
        );
        ServiceRequestMutation::File(request(""))
            .apply(&mut requests)
            .expect("unnumbered requests are allowed");
        assert_eq!(requests.0.len(), 2);
    }

    #[rstest]
    fn amend_and_withdraw_address_rows() {
        let mut requests = ServiceRequests(vec![request("SR-1"), request("SR-2")]);
        let mut closed = request("SR-2");
        closed.status = "Done".to_owned();
        ServiceRequestMutation::Amend {
            index: 1,
            request: closed,
        }
        .apply(&mut requests)
        .expect("request amended");
        ServiceRequestMutation::Withdraw { index: 0 }
            .apply(&mut requests)
            .expect("request withdrawn");
        assert_eq!(requests.0.len(), 1);
        assert_eq!(requests.0[0].status, "Done");
        assert_eq!(
            ServiceRequestMutation::Withdraw { index: 5 }.apply(&mut requests),
            Err(MutationError::OutOfRange { index: 5 })
        );
    }
}
