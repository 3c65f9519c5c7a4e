//! Use cases

pub mod ledger_service;
pub mod maintenance_service;
pub mod purchase_book;
pub mod slip_service;
pub mod viewer_service;
