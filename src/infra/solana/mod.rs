pub mod client;

pub use client::{Ledger, LedgerAccount, RpcLedger};
