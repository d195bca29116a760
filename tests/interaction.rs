use std::cell::Cell;
use std::rc::Rc;

use rand::{Rng, SeedableRng, rngs::StdRng};

use rime::{
    Result, Screen, Style,
    backend::test::TestRender,
    event::{InputSnapshot, PointerButton},
    geom::{Direction, Expanse, Point},
    tutils::{self, FixedMetrics, TLeaf, TSplit},
    widgets::{Button, DropDown, EditBox, Splitter, TreeNode, TreeView, TreeViewCfg},
};

/// Show engine tracing output under `--nocapture`. Safe to call from every
/// test; later installs are ignored.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_test_writer()
        .try_init();
}

fn click(s: &mut Screen, p: Point) -> Result<()> {
    s.pointer_down(p, PointerButton::Left)?;
    s.pointer_up(p, PointerButton::Left)
}

#[test]
fn hover_enter_out_always_pair() -> Result<()> {
    init_tracing();
    tutils::reset_state();
    let mut s = Screen::new(
        Box::new(TSplit::new()),
        Expanse::new(400, 100),
        Box::new(FixedMetrics::default()),
    );
    let root = s.tree().root();
    for name in ["a", "b", "c", "d"] {
        s.tree_mut().attach(root, Box::new(TLeaf::new(name)))?;
    }
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        // Points deliberately stray outside the viewport.
        let p = Point::new(rng.random_range(-50..450), rng.random_range(-50..150));
        s.pointer_moved(p)?;
    }
    // At every moment at most one widget is inside, and every out closes
    // the matching enter.
    let mut inside: Option<String> = None;
    for evt in tutils::get_state() {
        let (name, what) = evt.split_once('@').unwrap();
        match what {
            "enter" => {
                assert!(inside.is_none(), "enter {name} while {inside:?} inside");
                inside = Some(name.into());
            }
            "out" => {
                assert_eq!(inside.as_deref(), Some(name), "unmatched out {name}");
                inside = None;
            }
            "move" => assert_eq!(inside.as_deref(), Some(name), "move outside {name}"),
            _ => {}
        }
    }
    Ok(())
}

#[test]
fn focus_moves_between_edit_boxes() -> Result<()> {
    init_tracing();
    let style = Style::default();
    let mut s = Screen::new(
        Box::new(TSplit::new()),
        Expanse::new(400, 100),
        Box::new(FixedMetrics::default()),
    );
    let root = s.tree().root();
    let a = s
        .tree_mut()
        .attach(root, Box::new(EditBox::new(style.clone(), "left")))?;
    let b = s
        .tree_mut()
        .attach(root, Box::new(EditBox::new(style.clone(), "right")))?;

    click(&mut s, Point::new(50, 50))?;
    assert_eq!(s.focused(), Some(a));
    s.key(rime::event::Key::Char('!'))?;

    click(&mut s, Point::new(250, 50))?;
    assert_eq!(s.focused(), Some(b));
    s.key(rime::event::Key::Char('?'))?;

    // Each keystroke went to the box holding focus at the time.
    assert!(s.tree().widget_ref::<EditBox>(a)?.text().contains('!'));
    assert!(!s.tree().widget_ref::<EditBox>(a)?.text().contains('?'));
    assert!(s.tree().widget_ref::<EditBox>(b)?.text().contains('?'));
    Ok(())
}

/// An open drop-down swallows the click that dismisses it: the button
/// underneath never fires.
#[test]
fn dismissing_popup_swallows_the_click() -> Result<()> {
    init_tracing();
    let style = Style::default();
    let clicks = Rc::new(Cell::new(0));
    let c2 = clicks.clone();
    let mut s = Screen::new(
        Box::new(TSplit::new()),
        Expanse::new(400, 300),
        Box::new(FixedMetrics::default()),
    );
    let root = s.tree().root();
    let dd = s.tree_mut().attach(
        root,
        Box::new(DropDown::new(
            style.clone(),
            vec!["one".into(), "two".into(), "three".into()],
        )),
    )?;
    s.tree_mut().attach(
        root,
        Box::new(Button::new(style, "under").on_click(move || c2.set(c2.get() + 1))),
    )?;

    // Open the drop-down, then click on the button's half of the screen.
    let on_box = Point::new(100, 150);
    let on_button = Point::new(300, 150);
    click(&mut s, on_box)?;
    assert!(s.tree().widget_ref::<DropDown>(dd)?.is_open());
    click(&mut s, on_button)?;
    assert!(!s.tree().widget_ref::<DropDown>(dd)?.is_open());
    assert_eq!(clicks.get(), 0);

    // With the popup closed the same click reaches the button.
    click(&mut s, on_button)?;
    assert_eq!(clicks.get(), 1);
    Ok(())
}

#[test]
fn splitter_drag_through_snapshots() -> Result<()> {
    init_tracing();
    let mut s = Screen::new(
        Box::new(Splitter::new(Style::default(), Direction::Left, 200)),
        Expanse::new(400, 100),
        Box::new(FixedMetrics::default()),
    );
    let root = s.tree().root();
    s.tree_mut().attach(root, Box::new(TLeaf::new("a")))?;
    s.tree_mut().attach(root, Box::new(TLeaf::new("b")))?;

    let mut input = InputSnapshot {
        pointer: Point::new(200, 50),
        ..Default::default()
    };
    s.process_input(&input)?;
    input.set_down(PointerButton::Left, true);
    s.process_input(&input)?;
    assert_eq!(s.captured(), Some(root));

    // Drag far past the clamp limit, then release.
    input.pointer = Point::new(390, 50);
    s.process_input(&input)?;
    input.set_down(PointerButton::Left, false);
    s.process_input(&input)?;
    s.relayout()?;
    assert_eq!(s.tree().widget_ref::<Splitter>(root)?.offset(), 300);
    assert_eq!(s.captured(), None);
    Ok(())
}

#[test]
fn frame_draw_balances_scissors() -> Result<()> {
    init_tracing();
    let style = Style::default();
    let cfg = TreeViewCfg::default();
    let mut s = Screen::new(
        Box::new(TSplit::new()),
        Expanse::new(400, 300),
        Box::new(FixedMetrics::default()),
    );
    let root = s.tree().root();
    let tv = s
        .tree_mut()
        .attach(root, Box::new(TreeView::new(style.clone(), cfg)))?;
    for i in 0..8 {
        s.tree_mut().attach(
            tv,
            Box::new(TreeNode::new(style.clone(), cfg, &format!("n{i}"))),
        )?;
    }
    let dd = s.tree_mut().attach(
        root,
        Box::new(DropDown::new(style, vec!["a".into(), "b".into()])),
    )?;

    // Open the popup so the overlay pass clips too.
    click(&mut s, Point::new(300, 150))?;
    assert!(s.tree().widget_ref::<DropDown>(dd)?.is_open());

    let (buf, mut backend) = TestRender::create();
    s.draw(&mut backend)?;
    let buf = buf.lock().unwrap();
    // Both the tree view body and the popup pushed a scissor, and every push
    // was matched by a restore.
    assert!(buf.scissor_sets >= 4);
    assert_eq!(buf.scissor, None);
    assert!(!buf.is_empty());
    Ok(())
}

#[test]
fn update_drives_animations_to_rest() -> Result<()> {
    init_tracing();
    let style = Style::default();
    let mut s = Screen::new(
        Box::new(TSplit::new()),
        Expanse::new(400, 100),
        Box::new(FixedMetrics::default()),
    );
    let root = s.tree().root();
    s.tree_mut()
        .attach(root, Box::new(Button::new(style, "go")))?;
    click(&mut s, Point::new(200, 50))?;
    // The press flash runs for 0.2s; after that the update list drains and
    // further frames are inert.
    for _ in 0..5 {
        s.update(0.1)?;
    }
    s.update(0.1)?;
    Ok(())
}
