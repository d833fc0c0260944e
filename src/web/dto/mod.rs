//! Request and response DTOs for the COBBS web layer.

mod request;
mod response;

pub use request::{LoginRequest, SignupRequest};
pub use response::{
    ApiResponse, ComplaintResponse, HelpResponse, LostFoundResponse, StatusResponse,
};
