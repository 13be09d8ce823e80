pub mod instance;
pub mod metric;
pub mod parser;

pub use instance::{nearest_neighbor_route, tour_cost, validate_matrix, Instance};
pub use metric::DistanceMode;
pub use parser::{load_instance, parse_tsplib};
