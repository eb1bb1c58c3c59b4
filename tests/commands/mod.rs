//! Command-level tests driven by a scripted chat API


mod test_purge_flow;
mod test_session;
