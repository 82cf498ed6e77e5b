//! Salary Tax Engine
//!
//! This crate computes itemized income tax and net salary for a monthly
//! gross salary, given the tax rates of the person's locality: basic
//! deduction, municipal, regional and state income tax, pension
//! contribution, tax reductions, and fees.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
