//! End-to-end flows between MyCompany and PartnerA.

pub mod async_mdn;
pub mod exchange;
pub mod scheduler;
