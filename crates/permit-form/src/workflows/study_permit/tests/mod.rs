mod checklist;
mod common;
mod render;
mod tips;
mod validation;
