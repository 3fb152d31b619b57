//! Bridge from [`nami`] signals to managed widget properties.
//!
//! A binding watches a signal and hands every new value to a widget through
//! its composition path (`update_*`). The watcher guard is tied to the bound
//! component, so releasing the component or disposing the root unsubscribes
//! it. Updates never run under an outstanding borrow of the tree: a value
//! delivered while another edit is running is applied right after it.

use std::rc::Rc;

use nami::Signal;
use riverbed_core::{ComponentId, ComponentTree, Document, Root, Widget};

/// Applies the current value of `signal` to the widget `id` and re-applies it
/// on every change until the component is released or `root` is disposed.
///
/// `apply` should go through the widget's managed update path, so a value the
/// application set directly is never overwritten by the signal. It may set
/// other signals, including ones bound to the same root.
///
/// ```
/// use riverbed::reactive::bind;
/// use riverbed::widget::Text;
/// use riverbed_core::{Root, VDocument, VNode};
///
/// let root: Root<VDocument> = Root::string_only();
/// let label = root.with_tree_mut(|tree| {
///     let id = tree.create(|document| Text::new(document, ""));
///     tree.insert_child(root.container(), 0, id);
///     id
/// });
/// let name = nami::binding(String::from("Ada"));
/// bind(&root, label, &name, |text: &mut Text<VNode>, value: String| {
///     text.update_content(value);
/// });
/// name.set(String::from("Grace"));
/// assert_eq!(root.render_to_string(), "Grace");
/// ```
pub fn bind<D, W, S, F>(root: &Root<D>, id: ComponentId, signal: &S, apply: F)
where
    D: Document,
    W: Widget<D::Node>,
    S: Signal,
    F: Fn(&mut W, S::Output) + 'static,
{
    let apply = Rc::new(apply);
    root.update(apply_to::<D, W, S::Output, F>(id, Rc::clone(&apply), signal.get()));

    let handle = root.handle();
    let guard = signal.watch(move |context| {
        let edit = apply_to::<D, W, S::Output, F>(id, Rc::clone(&apply), context.into_value());
        if !handle.update(edit) {
            tracing::trace!(component = %id, "dropping signal update for a disposed root");
        }
    });
    root.retain_for(id, guard);
}

fn apply_to<D, W, T, F>(
    id: ComponentId,
    apply: Rc<F>,
    value: T,
) -> impl FnOnce(&mut ComponentTree<D>) + 'static
where
    D: Document,
    W: Widget<D::Node>,
    T: 'static,
    F: Fn(&mut W, T) + 'static,
{
    move |tree| match tree.widget_mut::<W>(id) {
        Some(widget) => apply(widget, value),
        None => tracing::trace!(component = %id, "dropping signal update for a missing component"),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use nami::binding;
    use riverbed_core::{Applier, Node, Root, RootOptions, VDocument, VNode};

    use super::bind;
    use crate::markup::{button, compose, div, text};
    use crate::widget::{Button, Text};

    #[test]
    fn counter_updates_mutate_the_existing_text_node() {
        let root = Root::attach(VDocument::new(), &RootOptions::new()).expect("body");
        let mut applier = root.applier();
        let page = div().child(text("0")).child(button("+"));
        let page_id = compose(&mut applier, 0, &page).expect("live root");
        let counter_id = root.with_tree(|tree| tree.children(page_id)[0]);
        let text_node = root
            .with_tree(|tree| tree.node(counter_id))
            .expect("live text node");

        let counter = binding(0);
        let updates = Rc::new(Cell::new(0));
        bind(&root, counter_id, &counter, {
            let updates = Rc::clone(&updates);
            move |text: &mut Text<VNode>, value: i32| {
                if text.update_content(value.to_string()) {
                    updates.set(updates.get() + 1);
                }
            }
        });

        counter.set(1);
        counter.set(2);

        assert_eq!(updates.get(), 2);
        let page_node = root.with_tree(|tree| tree.node(page_id)).expect("live page");
        assert!(
            page_node
                .child_at(0)
                .is_some_and(|node| node.same_node(&text_node))
        );
        assert_eq!(text_node.text_content(), "2");
        assert_eq!(
            root.render_to_string(),
            "<div>2<button type=\"button\">+</button></div>"
        );
        assert_eq!(
            root.mount_node().map(Node::inner_html),
            Some(root.render_to_string())
        );
    }

    #[test]
    fn local_writes_stop_signal_updates() {
        let root: Root<VDocument> = Root::string_only();
        let mut applier = root.applier();
        let id = compose(&mut applier, 0, &button("idle")).expect("root is live");

        let status = binding(String::from("loading"));
        bind(&root, id, &status, |button: &mut Button<VNode>, value: String| {
            button.update_label(value);
        });
        assert_eq!(root.render_to_string(), "<button type=\"button\">loading</button>");

        root.with_tree_mut(|tree| {
            if let Some(button) = tree.widget_mut::<Button<VNode>>(id) {
                button.set_label("pinned");
            }
        });
        status.set(String::from("done"));

        assert_eq!(root.render_to_string(), "<button type=\"button\">pinned</button>");
    }

    #[test]
    fn disposing_the_root_unsubscribes() {
        let root: Root<VDocument> = Root::string_only();
        let mut applier = root.applier();
        let id = compose(&mut applier, 0, &text("a")).expect("root is live");

        let source = binding(String::from("a"));
        let calls = Rc::new(Cell::new(0));
        bind(&root, id, &source, {
            let calls = Rc::clone(&calls);
            move |text: &mut Text<VNode>, value: String| {
                calls.set(calls.get() + 1);
                text.update_content(value);
            }
        });
        assert_eq!(calls.get(), 1);

        root.dispose();
        source.set(String::from("b"));

        assert_eq!(calls.get(), 1);
        assert_eq!(root.render_to_string(), "a");
    }

    #[test]
    fn chained_bindings_apply_after_the_outer_update() {
        let root: Root<VDocument> = Root::string_only();
        let mut applier = root.applier();
        let page_id = compose(&mut applier, 0, &div().child(text("a")).child(text("b")))
            .expect("root is live");
        let (source_id, upper_id) = root.with_tree(|tree| {
            let children = tree.children(page_id);
            (children[0], children[1])
        });

        let upper = binding(String::from("b"));
        bind(&root, upper_id, &upper, |text: &mut Text<VNode>, value: String| {
            text.update_content(value);
        });

        let source = binding(String::from("a"));
        bind(&root, source_id, &source, {
            let upper = upper.clone();
            move |text: &mut Text<VNode>, value: String| {
                upper.set(value.to_uppercase());
                text.update_content(value);
            }
        });
        assert_eq!(root.render_to_string(), "<div>aA</div>");

        source.set(String::from("hello"));
        assert_eq!(root.render_to_string(), "<div>helloHELLO</div>");
    }

    #[test]
    fn signal_writes_inside_with_tree_mut_are_applied_afterwards() {
        let root: Root<VDocument> = Root::string_only();
        let mut applier = root.applier();
        let id = compose(&mut applier, 0, &text("0")).expect("root is live");

        let count = binding(0);
        bind(&root, id, &count, |text: &mut Text<VNode>, value: i32| {
            text.update_content(value.to_string());
        });

        root.with_tree_mut(|tree| {
            count.set(7);
            assert_eq!(tree.render_to_string(id), "0");
        });

        assert_eq!(root.render_to_string(), "7");
    }

    #[test]
    fn releasing_a_component_drops_its_watchers() {
        let root: Root<VDocument> = Root::string_only();
        let mut applier = root.applier();
        let shared = binding(0);
        let calls = Rc::new(Cell::new(0));

        for _ in 0..100 {
            let id = compose(&mut applier, 0, &text("x")).expect("root is live");
            bind(&root, id, &shared, {
                let calls = Rc::clone(&calls);
                move |text: &mut Text<VNode>, value: i32| {
                    calls.set(calls.get() + 1);
                    text.update_content(value.to_string());
                }
            });
            assert_eq!(root.with_tree(|tree| tree.subscription_count(id)), 1);
            applier.remove(0, 1);
        }

        assert_eq!(Rc::strong_count(&calls), 1);
        let before = calls.get();
        shared.set(1);
        assert_eq!(calls.get(), before);
        assert!(root.with_tree(|tree| tree.children(root.container()).is_empty()));
    }
}
