//! Request payloads carried by generation tasks.

pub mod requests;
