// Semantic retrieval over the CV corpus.
// All embedding calls go through `EmbeddingProvider`; nothing else talks to the embeddings API.

pub mod embedding;
pub mod index;
