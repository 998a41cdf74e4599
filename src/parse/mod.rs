//! Inlezen van scènebeschrijvingen.

pub mod scene_xml;
