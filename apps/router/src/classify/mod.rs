// Job-listing classification: type-label resolution, keyword scoring, destination lookup.
// Handlers are the only part that knows about HTTP; everything else is pure.

pub mod classifier;
pub mod destinations;
pub mod handlers;
pub mod keyword_scorer;
pub mod normalize;
pub mod role;
pub mod table;
pub mod type_resolver;
