mod mapper;

#[cfg(test)]
mod tests;

pub use mapper::select_renderer;
