mod descriptions;
mod pipeline;
mod references;
