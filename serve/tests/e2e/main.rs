//! End-to-end tests: real server on 127.0.0.1:0, requests over HTTP with reqwest.

mod common;
mod concurrency;
mod forecast;
mod health;
mod invalid_json;
mod timesfm;
