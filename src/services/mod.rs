pub mod enrichment;
pub mod llm_client;
