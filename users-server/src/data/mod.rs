pub mod user_repository;

#[cfg(test)]
pub mod in_memory;
