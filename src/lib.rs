//! The StepMania simfile parser and chart analysis toolkit.
//!
//! A `.sm` simfile is a plain text file describing a song and one or
//! more charts for it: a sequence of `#TAG:VALUE;` entries carrying
//! metadata, a piecewise BPM schedule with pointwise stop events, and
//! NOTES blocks whose measures place note objects on discrete rows.
//! This crate ingests that text and produces an analyzable in-memory
//! model: lane-wise note rows aligned to both musical position
//! (measures, as exact rationals) and real time (seconds, also exact),
//! plus a toolkit of chart transformations: hold/roll body synthesis,
//! decorative filtering, permutation groups, sliding row windows, delta
//! sequences, density and uniformity measurements, row classification.
//!
//! # Usage
//!
//! ```
//! use sm_rs::sm::prelude::*;
//!
//! let source = r"
//! #TITLE:Example Song;
//! #BPMS:0=120;
//! #OFFSET:0;
//! #NOTES:
//!      dance-single:
//!      :
//!      Beginner:
//!      1:
//!      :
//! 1000
//! 0100
//! 0010
//! 0001
//! ;
//! ";
//! let simfile = parse_source(source, None).unwrap();
//! assert_eq!(simfile.title, "Example Song");
//!
//! let chart = &simfile.charts[0];
//! let times: Vec<_> = chart
//!     .note_field
//!     .iter()
//!     .map(|row| row.exact_time().unwrap())
//!     .collect();
//! assert_eq!(times[0], Time::ZERO);
//! assert_eq!(times[1], Time::new(Rational::new(1, 2)));
//! ```
//!
//! # About the format
//!
//! Each entry is `#TAG:VALUE;`, with whitespace free between entries and
//! `//` line comments stripped before scanning. The timing tags
//! (`BPMS`, `STOPS`) hold comma-separated `beat=value` pairs; beats
//! convert to measures with `beat / 4` under the format's fixed 4/4
//! signature. A NOTES entry carries six `:`-fields, the last being the
//! measure block:
//!
//! ```text
//! #NOTES:
//!      dance-single:
//!      step artist:
//!      Challenge:
//!      12:
//!      0,0,0,0,0:
//! 1000
//! 0010
//! 0100
//! 0001
//! ,
//! ...
//! ;
//! ```
//!
//! A measure of `N` rows places row `i` at local position `i/N`; row
//! characters are `0` `1` `2` `4` plus `3` (hold/roll tail), `M`
//! (mine), `F` (fake) and `L` (lift), one per lane, 4/6/8 lanes wide.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod sm;

pub use sm::{Result, SmError, StructuralError, parse_simfile, parse_source};
