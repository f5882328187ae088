//! PostgREST storage backend.
//!
//! Talks to a Supabase project's REST endpoint (`/rest/v1/<table>`) with the
//! service role key. Filters are rendered in PostgREST's query-string syntax
//! (`column=eq.value`, `column=in.(a,b)`).

mod error;
mod store;

pub use store::PostgrestStore;
