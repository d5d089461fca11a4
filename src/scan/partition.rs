use crate::signatures::Plugin;

/// One concrete unit of scan work: a fully built URL plus the endpoint
/// label it was derived from. `plugin` indexes into the catalog's plugin
/// list so jobs stay cheap to clone across workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub full_url: String,
    pub endpoint: String,
    pub plugin: usize,
}

/// Splits the full (url x endpoint) workload into at most `workers`
/// balanced, non-empty partitions.
///
/// Jobs are generated in a fixed order (urls, then plugins, then endpoints)
/// and dealt front-to-back: the first `num_filled` partitions absorb the
/// remainder so sizes never differ by more than one. Each worker owns
/// exactly one partition, so no shared queue is needed at scan time.
pub fn partition(urls: &[String], plugins: &[Plugin], workers: usize) -> Vec<Vec<Job>> {
    let jobs = build_jobs(urls, plugins);
    let total = jobs.len();
    if total == 0 || workers == 0 {
        return Vec::new();
    }

    let filled_size = total.div_ceil(workers);
    let reduced_size = total / workers;
    let num_reduced = filled_size * workers - total;
    let num_filled = workers - num_reduced;

    let mut partitions = Vec::with_capacity(workers.min(total));
    let mut jobs = jobs.into_iter();
    for i in 0..workers {
        let size = if i < num_filled {
            filled_size
        } else {
            reduced_size
        };
        if size == 0 {
            break;
        }
        partitions.push(jobs.by_ref().take(size).collect());
    }
    partitions
}

fn build_jobs(urls: &[String], plugins: &[Plugin]) -> Vec<Job> {
    let mut jobs = Vec::new();
    for url in urls {
        for (plugin_idx, plugin) in plugins.iter().enumerate() {
            for endpoint in &plugin.endpoints {
                let endpoint = if plugin.query_string.is_empty() {
                    endpoint.clone()
                } else {
                    format!("{endpoint}?{}", plugin.query_string)
                };
                jobs.push(Job {
                    full_url: format!("{url}{endpoint}"),
                    endpoint,
                    plugin: plugin_idx,
                });
            }
        }
    }
    jobs
}
