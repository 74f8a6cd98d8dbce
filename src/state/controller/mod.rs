mod app;
mod catalog;
mod details;
mod operations;

pub(crate) use app::{AppController, Services};
