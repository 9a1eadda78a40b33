/// Read-through caching around an async block.
///
/// Looks the key up in the cache when one is configured. On a hit the cached value
/// is returned; otherwise the block runs and its successful result is queued for
/// writing. A failing cache read is logged and treated as a miss, so Redis
/// trouble never hides data the block could fetch.
///
/// # Arguments
/// * `$cache`: an `Option<&Cache>`.
/// * `$key`: the `CacheKey` to read and write.
/// * `$ttl`: time-to-live for the stored value, in seconds.
/// * `$block`: future computing the value on a miss, yielding `AppResult<T>`.
///
/// # Example
/// ```rust,ignore
/// let details: MovieDetails = cached!(self.cache.as_ref(), key, 3600, async move {
///     fetch_from_api().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let cache: Option<&$crate::db::Cache> = $cache;
        let hit = match cache {
            Some(cache) => cache.get_from_cache(&$key).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, key = %$key, "Cache read failed, treating as miss");
                None
            }),
            None => None,
        };

        match hit {
            Some(cached) => Ok(cached),
            None => match $block.await {
                Ok(value) => {
                    if let Some(cache) = cache {
                        cache.set_in_background(&$key, &value, $ttl);
                    }
                    Ok(value)
                }
                Err(e) => Err(e),
            },
        }
    }};
}
