#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use popup_core::{DialogOptions, DialogValue};
use popup_dom::{Dom, EventKind, ScriptedModal};
use popup_web::{EventSink, NodeTable, WebDom};
use popup_widgets::{DialogEvent, DialogHost};
use pretty_assertions::assert_eq;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

type Seen = Rc<RefCell<Vec<DialogEvent>>>;

fn web_dom() -> (WebDom, Seen) {
    let seen: Seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let sink: EventSink = Rc::new(move |event| log.borrow_mut().push(event));
    let nodes = NodeTable::from_window().unwrap().into_shared();
    (WebDom::new(nodes, sink), seen)
}

#[wasm_bindgen_test]
fn fragment_classes_and_removal() {
    let (mut dom, _) = web_dom();
    let div = dom.create_element("div");
    dom.add_classes(div, "a b");
    let parts = dom.create_fragment("<b>x</b> y");
    assert_eq!(parts.len(), 2);
    for part in parts {
        dom.append_child(div, part);
    }
    assert_eq!(dom.text(div), "x y");
    assert!(dom.has_class(div, "b"));
    assert!(!dom.contains(div));

    let body = dom.body();
    dom.append_child(body, div);
    assert!(dom.contains(div));
    assert_eq!(dom.query_class(body, "a"), vec![div]);

    dom.remove(div);
    assert!(!dom.contains(div));
    assert_eq!(dom.text(div), "");
}

#[wasm_bindgen_test]
fn removed_subtrees_leave_the_node_table() {
    let (mut dom, _) = web_dom();
    let tracked = dom.nodes().borrow().len();
    let body = dom.body();
    for _ in 0..3 {
        let div = dom.create_element("div");
        dom.add_class(div, "transient");
        dom.append_markup(div, "<span class=\"inner\">a</span> b");
        dom.append_child(body, div);
        let inner = dom.query_class(div, "inner");
        assert_eq!(inner.len(), 1);
        assert_eq!(dom.query_class(div, "inner"), inner);
        assert_eq!(dom.query_class(body, "transient"), vec![div]);
        dom.remove(div);
        assert!(dom.query_class(body, "transient").is_empty());
        assert_eq!(dom.nodes().borrow().len(), tracked);
    }
}

#[wasm_bindgen_test]
fn real_clicks_reach_the_sink_until_unlistened() {
    let (mut dom, seen) = web_dom();
    let button = dom.create_element("button");
    let body = dom.body();
    dom.append_child(body, button);
    dom.listen(button, EventKind::Click);

    let element: HtmlElement = dom
        .nodes()
        .borrow()
        .element(button)
        .unwrap()
        .dyn_into()
        .unwrap();
    element.click();
    let click = DialogEvent::dom(button, EventKind::Click);
    assert_eq!(*seen.borrow(), vec![click]);

    dom.unlisten(button, EventKind::Click);
    element.click();
    assert_eq!(seen.borrow().len(), 1);
    dom.remove(button);
}

#[wasm_bindgen_test]
fn text_prompt_on_live_document() {
    let (dom, _) = web_dom();
    let mut host = DialogHost::new(dom, ScriptedModal::new());
    let got = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&got);
    let id = host
        .text(
            DialogOptions::new()
                .title("Name")
                .body("Your name?")
                .on_ok(move |value| *sink.borrow_mut() = Some(value)),
        )
        .unwrap();
    let input = host.control(id).and_then(|c| c.focus_target()).unwrap();
    assert_eq!(host.dom().focused(), Some(input));
    host.dom_mut().set_value(input, "Ada");

    let ok = host.frame(id).and_then(|f| f.ok).unwrap();
    host.dispatch(DialogEvent::dom(ok, EventKind::Click));
    assert_eq!(*got.borrow(), Some(Some(DialogValue::from("Ada"))));
    assert!(!host.dom().contains(ok));
    assert_eq!(host.dom().listener_count(), 0);
}

#[wasm_bindgen_test]
fn select_reflects_preselected_value() {
    let (dom, _) = web_dom();
    let mut host = DialogHost::new(dom, ScriptedModal::new());
    let id = host
        .select(
            DialogOptions::new()
                .title("Pick")
                .body("One")
                .options([("x", "X"), ("y", "Y")])
                .val("y")
                .on_ok(|_| {}),
        )
        .unwrap();
    let select = host.control(id).and_then(|c| c.focus_target()).unwrap();
    assert_eq!(host.dom().value(select), "y");
    for resolution in host.dismiss_all() {
        resolution.fire();
    }
}
