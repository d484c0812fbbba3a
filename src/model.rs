pub mod facade {
    pub mod redis;
}
