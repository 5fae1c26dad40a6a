mod expansion;
mod labels;
mod metadata;
mod structure;
