pub mod domain;
pub mod graph;
pub mod protocol;
pub mod rest;
