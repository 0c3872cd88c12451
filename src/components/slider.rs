use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Interval;
use log::{debug, warn};
use web_sys::{Document, Element};

use crate::config;
use crate::dom;
use crate::error::Result;

/// Index into a non-empty ring of slides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { len, current: 0 })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.len;
        self.current
    }

    pub fn prev(&mut self) -> usize {
        self.current = (self.current + self.len - 1) % self.len;
        self.current
    }

    /// Visibility of each slide, in order. Exactly one entry is `true`.
    pub fn visibility(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| i == self.current)
    }
}

/// Starts repeating timers. Dropping the returned handle cancels the timer.
pub trait Timers {
    type Handle;

    fn every(&self, millis: u32, tick: Box<dyn FnMut()>) -> Self::Handle;
}

pub struct BrowserTimers;

impl Timers for BrowserTimers {
    type Handle = Interval;

    fn every(&self, millis: u32, tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(millis, tick)
    }
}

pub trait SlideView {
    fn show(&self, carousel: &Carousel) -> Result<()>;
}

impl SlideView for Vec<Element> {
    fn show(&self, carousel: &Carousel) -> Result<()> {
        for (slide, visible) in self.iter().zip(carousel.visibility()) {
            dom::set_hidden(slide, !visible)?;
        }
        Ok(())
    }
}

pub struct Slider<V: SlideView, T: Timers> {
    carousel: Carousel,
    view: V,
    timers: T,
    timer: Option<T::Handle>,
    this: Weak<RefCell<Slider<V, T>>>,
}

impl<V: SlideView + 'static, T: Timers + 'static> Slider<V, T> {
    pub fn new(carousel: Carousel, view: V, timers: T) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|this| {
            RefCell::new(Slider {
                carousel,
                view,
                timers,
                timer: None,
                this: this.clone(),
            })
        })
    }

    pub fn render(&self) -> Result<()> {
        self.view.show(&self.carousel)
    }

    fn advance(&mut self) -> Result<()> {
        self.carousel.next();
        debug!("testimonial {}", self.carousel.current());
        self.render()
    }

    fn retreat(&mut self) -> Result<()> {
        self.carousel.prev();
        debug!("testimonial {}", self.carousel.current());
        self.render()
    }

    pub fn stop(&mut self) {
        self.timer = None;
    }

    /// Restarts auto-advance with a fresh interval, replacing any running one.
    pub fn start(&mut self) {
        self.stop();
        let this = self.this.clone();
        self.timer = Some(self.timers.every(
            config::SLIDE_INTERVAL_MS,
            Box::new(move || {
                if let Some(slider) = this.upgrade() {
                    if let Err(err) = slider.borrow_mut().advance() {
                        warn!("testimonial auto-advance failed: {}", err);
                    }
                }
            }),
        ));
    }

    pub fn step(&mut self, forward: bool) -> Result<()> {
        self.stop();
        let result = if forward { self.advance() } else { self.retreat() };
        self.start();
        result
    }
}

pub fn mount(document: &Document) -> Result<bool> {
    let Some(container) = dom::select(document, config::SLIDER) else {
        return Ok(false);
    };
    let slides = dom::select_all_in(&container, config::SLIDE);
    let Some(carousel) = Carousel::new(slides.len()) else {
        debug!("testimonial slider has no slides");
        return Ok(false);
    };

    let slider = Slider::new(carousel, slides, BrowserTimers);
    {
        let mut slider = slider.borrow_mut();
        slider.render()?;
        slider.start();
    }

    for (selector, forward) in [(config::SLIDE_PREV, false), (config::SLIDE_NEXT, true)] {
        let Some(control) = dom::select_in(&container, selector) else {
            continue;
        };
        let slider = slider.clone();
        dom::listen(&control, "click", move |_| {
            if let Err(err) = slider.borrow_mut().step(forward) {
                warn!("testimonial navigation failed: {}", err);
            }
        })?;
    }

    {
        let slider = slider.clone();
        dom::listen(&container, "mouseenter", move |_| slider.borrow_mut().stop())?;
    }
    dom::listen(&container, "mouseleave", move |_| slider.borrow_mut().start())?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Ledger {
        started: Cell<usize>,
        live: Cell<usize>,
        ticks: RefCell<Vec<(usize, Box<dyn FnMut()>)>>,
    }

    #[derive(Clone, Default)]
    struct FakeTimers(Rc<Ledger>);

    struct FakeHandle {
        id: usize,
        ledger: Rc<Ledger>,
    }

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            self.ledger.live.set(self.ledger.live.get() - 1);
            self.ledger.ticks.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }

    impl Timers for FakeTimers {
        type Handle = FakeHandle;

        fn every(&self, millis: u32, tick: Box<dyn FnMut()>) -> FakeHandle {
            assert_eq!(millis, config::SLIDE_INTERVAL_MS);
            let ledger = &self.0;
            let id = ledger.started.get();
            ledger.started.set(id + 1);
            ledger.live.set(ledger.live.get() + 1);
            ledger.ticks.borrow_mut().push((id, tick));
            FakeHandle {
                id,
                ledger: ledger.clone(),
            }
        }
    }

    impl FakeTimers {
        fn live(&self) -> usize {
            self.0.live.get()
        }

        fn started(&self) -> usize {
            self.0.started.get()
        }

        fn fire(&self) {
            for (_, tick) in self.0.ticks.borrow_mut().iter_mut() {
                tick();
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingView(Rc<RefCell<Vec<usize>>>);

    impl SlideView for RecordingView {
        fn show(&self, carousel: &Carousel) -> Result<()> {
            assert_eq!(carousel.visibility().filter(|v| *v).count(), 1);
            self.0.borrow_mut().push(carousel.current());
            Ok(())
        }
    }

    fn started_slider(
        len: usize,
    ) -> (Rc<RefCell<Slider<RecordingView, FakeTimers>>>, RecordingView, FakeTimers) {
        let view = RecordingView::default();
        let timers = FakeTimers::default();
        let slider = Slider::new(Carousel::new(len).unwrap(), view.clone(), timers.clone());
        slider.borrow().render().unwrap();
        slider.borrow_mut().start();
        (slider, view, timers)
    }

    #[test]
    fn empty_ring_is_rejected() {
        assert!(Carousel::new(0).is_none());
    }

    #[test]
    fn wraps_in_both_directions() {
        let mut carousel = Carousel::new(3).unwrap();
        assert_eq!(carousel.prev(), 2);
        assert_eq!(carousel.next(), 0);
        assert_eq!(carousel.next(), 1);
        assert_eq!(carousel.next(), 2);
        assert_eq!(carousel.next(), 0);
    }

    #[test]
    fn single_slide_is_a_fixed_point() {
        let mut carousel = Carousel::new(1).unwrap();
        assert_eq!(carousel.next(), 0);
        assert_eq!(carousel.prev(), 0);
        assert_eq!(carousel.visibility().collect::<Vec<_>>(), vec![true]);
    }

    #[test]
    fn timer_tick_advances_the_slide() {
        let (_slider, view, timers) = started_slider(3);
        timers.fire();
        timers.fire();
        assert_eq!(*view.0.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn repeated_starts_keep_a_single_timer() {
        let (slider, _view, timers) = started_slider(3);
        slider.borrow_mut().start();
        slider.borrow_mut().start();
        assert_eq!(timers.live(), 1);
        assert_eq!(timers.started(), 3);
    }

    #[test]
    fn manual_navigation_restarts_the_timer() {
        let (slider, view, timers) = started_slider(3);
        slider.borrow_mut().step(false).unwrap();
        assert_eq!(timers.live(), 1);
        assert_eq!(timers.started(), 2);

        slider.borrow_mut().step(true).unwrap();
        assert_eq!(timers.live(), 1);
        assert_eq!(timers.started(), 3);
        assert_eq!(*view.0.borrow(), vec![0, 2, 0]);
    }

    #[test]
    fn hover_pauses_and_leaving_resumes() {
        let (slider, view, timers) = started_slider(2);
        slider.borrow_mut().stop();
        assert_eq!(timers.live(), 0);
        timers.fire();
        assert_eq!(*view.0.borrow(), vec![0]);

        slider.borrow_mut().start();
        assert_eq!(timers.live(), 1);
        timers.fire();
        assert_eq!(*view.0.borrow(), vec![0, 1]);
    }

    proptest! {
        #[test]
        fn next_and_prev_are_inverses(len in 1usize..64, steps in 0usize..200) {
            let mut carousel = Carousel::new(len).unwrap();
            for _ in 0..steps {
                carousel.next();
            }
            let start = carousel.current();

            carousel.next();
            carousel.prev();
            prop_assert_eq!(carousel.current(), start);

            carousel.prev();
            carousel.next();
            prop_assert_eq!(carousel.current(), start);
        }

        #[test]
        fn exactly_one_slide_visible(len in 1usize..64, moves in proptest::collection::vec(any::<bool>(), 0..100)) {
            let mut carousel = Carousel::new(len).unwrap();
            for forward in moves {
                if forward { carousel.next(); } else { carousel.prev(); }
                prop_assert!(carousel.current() < len);
                prop_assert_eq!(carousel.visibility().filter(|v| *v).count(), 1);
            }
        }

        #[test]
        fn never_more_than_one_live_timer(actions in proptest::collection::vec(0u8..4, 0..50)) {
            let (slider, _view, timers) = started_slider(4);
            for action in actions {
                match action {
                    0 => slider.borrow_mut().stop(),
                    1 => slider.borrow_mut().start(),
                    2 => slider.borrow_mut().step(true).unwrap(),
                    _ => timers.fire(),
                }
                prop_assert!(timers.live() <= 1);
            }
        }
    }
}
