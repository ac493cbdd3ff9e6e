// src/filter/logic.rs

use std::path::Path;
use std::sync::Arc;

use super::FileFilter;
use crate::fs::EntryAttributes;

/// Accepts when every inner filter accepts. An empty list accepts nothing.
#[derive(Debug, Clone, Default)]
pub struct AndFilter {
    filters: Vec<Arc<dyn FileFilter>>,
}

impl AndFilter {
    pub fn new(filters: Vec<Arc<dyn FileFilter>>) -> Self {
        Self { filters }
    }

    pub fn add(&mut self, filter: Arc<dyn FileFilter>) {
        self.filters.push(filter);
    }

    pub fn filters(&self) -> &[Arc<dyn FileFilter>] {
        &self.filters
    }
}

impl FileFilter for AndFilter {
    fn accept(&self, path: &Path, attrs: &EntryAttributes) -> bool {
        !self.filters.is_empty() && self.filters.iter().all(|f| f.accept(path, attrs))
    }
}

/// Accepts when any inner filter accepts. An empty list accepts nothing.
#[derive(Debug, Clone, Default)]
pub struct OrFilter {
    filters: Vec<Arc<dyn FileFilter>>,
}

impl OrFilter {
    pub fn new(filters: Vec<Arc<dyn FileFilter>>) -> Self {
        Self { filters }
    }

    pub fn add(&mut self, filter: Arc<dyn FileFilter>) {
        self.filters.push(filter);
    }

    pub fn filters(&self) -> &[Arc<dyn FileFilter>] {
        &self.filters
    }
}

impl FileFilter for OrFilter {
    fn accept(&self, path: &Path, attrs: &EntryAttributes) -> bool {
        self.filters.iter().any(|f| f.accept(path, attrs))
    }
}

#[derive(Debug, Clone)]
pub struct NotFilter {
    inner: Arc<dyn FileFilter>,
}

impl NotFilter {
    pub fn new(inner: Arc<dyn FileFilter>) -> Self {
        Self { inner }
    }
}

impl FileFilter for NotFilter {
    fn accept(&self, path: &Path, attrs: &EntryAttributes) -> bool {
        !self.inner.accept(path, attrs)
    }
}

pub fn and_filter<I>(filters: I) -> Arc<dyn FileFilter>
where
    I: IntoIterator<Item = Arc<dyn FileFilter>>,
{
    Arc::new(AndFilter::new(filters.into_iter().collect()))
}

pub fn or_filter<I>(filters: I) -> Arc<dyn FileFilter>
where
    I: IntoIterator<Item = Arc<dyn FileFilter>>,
{
    Arc::new(OrFilter::new(filters.into_iter().collect()))
}

pub fn not_filter(filter: Arc<dyn FileFilter>) -> Arc<dyn FileFilter> {
    Arc::new(NotFilter::new(filter))
}
