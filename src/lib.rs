//! This crate implements an Euler Tour Tree: a dynamic forest data structure
//! that tracks connectivity of an undirected forest under edge `link`/`cut`,
//! answering `connected`, `find_root` and `size` queries in expected O(log n).
//!
//! See [tour::Tour] for the main entry point.
//!
//! ## Usage
//!
//! ```
//! use euler_tour_tree::tour::Tour;
//!
//! let mut tour: Tour<i32> = Tour::new();
//! for v in 1..=5 {
//!     tour.create_vertex(v);
//! }
//! tour.link(&1, &2);
//! tour.link(&2, &3);
//! tour.link(&3, &4);
//! tour.link(&4, &5);
//! assert!(tour.connected(&1, &5));
//! assert_eq!(tour.size(&3), 5);
//!
//! tour.cut(&3, &4);
//! assert!(!tour.connected(&1, &5));
//! assert_eq!(tour.size(&1), 3);
//! ```
//!
//! You can see example usage at `src/bin/example.rs` and run it with `cargo run`.
//!
//! ## Implementation
//!
//! The tour is a sequence of half-edges kept in tour order by a treap
//! (`src/treap.rs`), a probabilistically balanced BST supporting split and
//! concat in expected O(log n). Each vertex records only two anchors into
//! that sequence (`src/vertex.rs`); each undirected edge is two half-edges
//! (`src/half_edge.rs`) indexed for lookup by endpoint pair (`src/edge_index.rs`).
//! All structural mutation — re-rooting, linking, cutting — lives in
//! `src/tour.rs`.
//!
//! ## Testing
//!
//! Run the tests using:
//!
//! ```skip
//! cargo test
//! ```
//!
//! Add `-- --ignored` to run the stress test (which runs indefinitely with
//! random data until it finds a disagreement with the naive model). Use
//! `cargo bench` to see the benchmarks.
pub mod edge_index;
pub mod half_edge;
pub mod iter;
pub mod tour;
pub mod treap;
pub mod vertex;

pub use tour::Tour;
