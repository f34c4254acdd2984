//! Burger assembly and scoring engine: ingredients bond to stacks on contact,
//! finished stacks are graded against orders, and a shift is tracked in
//! Standard or Hell's Kitchen mode. Physics, input and presentation are
//! collaborators that feed events in and receive cues out.

pub mod feedback;
pub mod game;
pub mod geometry;
pub mod sim;
