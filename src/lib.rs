//! # docqa
//!
//! A retrieval-augmented question answering engine for text documents.
//!
//! docqa ingests a document by splitting it into overlapping,
//! sentence-aware chunks and embedding each one; at question time it
//! embeds the question, ranks stored chunks by cosine similarity, and
//! feeds the top matches to a chat model as numbered, citable context.
//!
//! ## Architecture
//!
//! ```text
//! ingest:  text ──▶ chunker ──▶ embedding gateway ──▶ store (SQLite)
//!
//! ask:     question ──▶ embedding gateway ──▶ ranker ──▶ context
//!          assembler ──▶ chat provider ──▶ answer + sources
//!                                       └──▶ query log
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docqa init                                 # create database
//! docqa ingest notes.txt --title "Notes"     # chunk + embed + store
//! docqa ask "What is covered?"               # retrieve + answer
//! docqa health                               # provider reachability
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Typed pipeline errors |
//! | [`chunk`] | Sliding-window text chunking |
//! | [`provider`] | Embedding/chat provider abstraction |
//! | [`embedding`] | Dimension-enforcing gateway + vector codecs |
//! | [`rank`] | Cosine similarity ranking |
//! | [`answer`] | Context assembly and answer generation |
//! | [`ingest`] | Atomic ingestion pipeline |
//! | [`ask`] | Question-answering pipeline |
//! | [`health`] | Provider health aggregation |
//! | [`store`] | Storage trait, SQLite and in-memory backends |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod answer;
pub mod ask;
pub mod chunk;
pub mod config;
pub mod db;
pub mod embedding;
pub mod error;
pub mod health;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod provider;
pub mod rank;
pub mod store;
