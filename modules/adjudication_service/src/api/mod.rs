//! API surfaces exposed by this module

pub mod rest;
