pub mod knowledge_cmd;
pub mod onboard;
pub mod run_cmd;
pub mod sequences_cmd;
pub mod status;
