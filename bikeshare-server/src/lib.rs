//! Bike-share station finder server.
//!
//! Answers "where is the nearest station I can rent a bike from (or return
//! one to), and how do I get there?" using a city's public GBFS feeds, a
//! geocoder and a routing service.

pub mod cache;
pub mod config;
pub mod domain;
pub mod finder;
pub mod gbfs;
pub mod geocode;
pub mod ranker;
pub mod routing;
pub mod web;
