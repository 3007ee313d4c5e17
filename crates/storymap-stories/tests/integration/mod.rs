mod lookup;
mod pipeline;
