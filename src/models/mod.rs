// src/models/mod.rs

pub mod media;
pub mod notification;
pub mod post;
pub mod user;
