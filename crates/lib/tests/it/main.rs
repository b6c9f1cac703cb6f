/*! Integration tests for tether.
 *
 * This test suite is organized as a single integration test binary.
 * The module structure mirrors the main library structure:
 * - container: dotted-path storage, aliasing, merge and serialization
 * - entity: relation materialization, caching and two-way synchronization
 * - collection: typed collections, promotion, filtering and sorting
 * - relations: static registration, introspection and auto-loading
 * - remote: lifecycle verbs over the transport boundary
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("tether=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod collection;
mod container;
mod remote;
