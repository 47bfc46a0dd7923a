use scripthost_core::{
    ConfigNode, ConfigurationError, MemberKind, NativeMember, NativeResolver, NativeType,
    RegistryCache, ResolveError, TableResolver,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// Resolver wrapper counting type resolutions, to observe build executions.
struct CountingResolver {
    inner: TableResolver,
    type_lookups: AtomicUsize,
}

impl CountingResolver {
    fn new(inner: TableResolver) -> Self {
        Self {
            inner,
            type_lookups: AtomicUsize::new(0),
        }
    }

    fn lookups(&self) -> usize {
        self.type_lookups.load(Ordering::SeqCst)
    }
}

impl NativeResolver for CountingResolver {
    fn resolve_type(&self, type_name: &str) -> Result<NativeType, ResolveError> {
        self.type_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_type(type_name)
    }

    fn resolve_member(
        &self,
        native_type: &NativeType,
        kind: MemberKind,
        member_name: &str,
    ) -> Option<NativeMember> {
        self.inner.resolve_member(native_type, kind, member_name)
    }
}

fn structural_tree() -> ConfigNode {
    serde_json::from_value(serde_json::json!({
        "kind": "configuration",
        "children": [
            {
                "kind": "class",
                "attributes": {
                    "name": "HTMLElement",
                    "native": "HtmlElement",
                    "host_object": "true"
                }
            },
            {
                "kind": "class",
                "attributes": {
                    "name": "HTMLHeadingElement",
                    "native": "HtmlHeading",
                    "extends": "HTMLElement",
                    "host_object": "true",
                    "element": "h1"
                }
            },
            {
                "kind": "class",
                "attributes": {
                    "name": "HTMLQuoteElement",
                    "native": "HtmlQuote",
                    "extends": "HTMLElement",
                    "host_object": "true",
                    "element": "q"
                }
            },
            {
                "kind": "class",
                "attributes": {
                    "name": "HTMLTableSectionElement",
                    "native": "HtmlTableSection",
                    "extends": "HTMLElement",
                    "host_object": "true",
                    "element": "thead"
                }
            },
            {
                "kind": "class",
                "attributes": {
                    "name": "RowBinding",
                    "native": "HtmlRowBinding",
                    "extends": "HTMLElement",
                    "element": "tr"
                }
            }
        ]
    }))
    .expect("structural tree")
}

fn structural_resolver() -> TableResolver {
    let mut resolver = TableResolver::new();
    for kind in ["h1", "q", "thead", "tr"] {
        resolver.register_type(kind);
    }
    resolver
}

#[test]
fn related_element_kinds_collapse_onto_shared_host_classes() {
    let cache = RegistryCache::new(structural_tree(), Arc::new(structural_resolver()));
    let map = cache.structural_element_map().expect("element map");

    for kind in ["h1", "h2", "h3", "h4", "h5", "h6"] {
        assert_eq!(map.host_class(kind), Some("HTMLHeadingElement"), "{kind}");
    }
    for kind in ["q", "blockquote"] {
        assert_eq!(map.host_class(kind), Some("HTMLQuoteElement"), "{kind}");
    }
    for kind in ["thead", "tbody", "tfoot"] {
        assert_eq!(
            map.host_class(kind),
            Some("HTMLTableSectionElement"),
            "{kind}"
        );
    }
}

#[test]
fn shadow_classes_are_skipped_when_recording_the_host() {
    let cache = RegistryCache::new(structural_tree(), Arc::new(structural_resolver()));
    let map = cache.structural_element_map().expect("element map");
    // RowBinding declares the link but is not a host object; its nearest
    // host ancestor answers for the kind.
    assert_eq!(map.host_class("tr"), Some("HTMLElement"));
}

#[test]
fn concurrent_first_callers_observe_exactly_one_build() {
    let resolver = Arc::new(CountingResolver::new(structural_resolver()));
    let cache = Arc::new(RegistryCache::new(structural_tree(), resolver.clone()));
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.structural_element_map().expect("element map")
            })
        })
        .collect();

    let maps: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread join"))
        .collect();

    for map in &maps[1..] {
        assert!(Arc::ptr_eq(&maps[0], map));
    }
    // One build resolves each of the four declared links exactly once.
    assert_eq!(resolver.lookups(), 4);
}

#[test]
fn unresolvable_element_kind_fails_the_build() {
    let tree: ConfigNode = serde_json::from_value(serde_json::json!({
        "kind": "configuration",
        "children": [
            {
                "kind": "class",
                "attributes": {
                    "name": "HTMLVideoElement",
                    "native": "HtmlVideo",
                    "host_object": "true",
                    "element": "video"
                }
            }
        ]
    }))
    .expect("tree");
    let cache =
        RegistryCache::with_element_overrides(tree, Arc::new(TableResolver::new()), Vec::new());

    let err = cache
        .structural_element_map()
        .expect_err("unregistered element kind");
    assert!(matches!(
        err,
        ConfigurationError::ElementKindUnresolved { .. }
    ));

    // The failure is cached, not rebuilt.
    let again = cache
        .structural_element_map()
        .expect_err("cached structural error");
    assert_eq!(err, again);
}

#[test]
fn chain_without_host_object_ancestor_fails_the_build() {
    let tree: ConfigNode = serde_json::from_value(serde_json::json!({
        "kind": "configuration",
        "children": [
            {
                "kind": "class",
                "attributes": {
                    "name": "ShadowOnly",
                    "native": "HtmlShadowOnly",
                    "element": "shadow"
                }
            }
        ]
    }))
    .expect("tree");
    let mut resolver = TableResolver::new();
    resolver.register_type("shadow");
    let cache = RegistryCache::with_element_overrides(tree, Arc::new(resolver), Vec::new());

    let err = cache
        .structural_element_map()
        .expect_err("no host ancestor");
    assert_eq!(
        err,
        ConfigurationError::NoHostAncestor {
            class: "ShadowOnly".to_string(),
        }
    );
}

#[test]
fn override_naming_an_undeclared_class_fails_the_build() {
    let tree: ConfigNode = serde_json::from_value(serde_json::json!({
        "kind": "configuration",
        "children": [
            { "kind": "class", "attributes": { "name": "A", "native": "NativeA" } }
        ]
    }))
    .expect("tree");
    let cache = RegistryCache::with_element_overrides(
        tree,
        Arc::new(TableResolver::new()),
        vec![("h1".to_string(), "HTMLHeadingElement".to_string())],
    );

    let err = cache.structural_element_map().expect_err("unknown override target");
    assert_eq!(
        err,
        ConfigurationError::UnknownClass("HTMLHeadingElement".to_string())
    );
}
