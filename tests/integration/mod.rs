//! Integration tests for the reputation ledger

mod lifecycle;
mod persistence;
mod properties;
mod support;
mod vouching;
