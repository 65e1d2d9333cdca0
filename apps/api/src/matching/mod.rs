// Resume ↔ job description matching.
// Implements: chunking, similarity ranking, JD summary, fit analysis and the request pipeline.
// All generation calls go through llm_client; all vectors come from embeddings.

pub mod analyzer;
pub mod chunker;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod ranker;
pub mod summarizer;
