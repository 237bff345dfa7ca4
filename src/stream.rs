use crate::goal::Goal;
use crate::state::{SResult, State};

/// A deferred stream computation.
///
/// Lazy nodes are forced one step at a time by the solver; `MPlus` realizes
/// the fair interleave of disjunctions and `Bind` pipes a stream through a
/// goal. `Delay` makes a stream lazy again, which is what keeps deep
/// disjunctions from starving each other.
#[derive(Debug)]
pub enum Lazy {
    Bind(LazyStream, Goal),
    MPlus(LazyStream, LazyStream),
    Pause(Box<State>, Goal),
    Delay(Stream),
}

#[derive(Debug)]
pub struct LazyStream(pub Box<Lazy>);

impl LazyStream {
    pub fn bind(ls: LazyStream, goal: Goal) -> LazyStream {
        LazyStream(Box::new(Lazy::Bind(ls, goal)))
    }

    pub fn mplus(ls1: LazyStream, ls2: LazyStream) -> LazyStream {
        LazyStream(Box::new(Lazy::MPlus(ls1, ls2)))
    }

    pub fn pause(state: Box<State>, goal: Goal) -> LazyStream {
        LazyStream(Box::new(Lazy::Pause(state, goal)))
    }

    pub fn delay(stream: Stream) -> LazyStream {
        LazyStream(Box::new(Lazy::Delay(stream)))
    }
}

/// Lazy sequence of constraint states produced by goal evaluation.
///
/// Answers are emitted in producer order within one stream; interleaving
/// across merged streams is deterministic for a fixed goal tree.
#[derive(Debug)]
pub enum Stream {
    Empty,
    Unit(Box<State>),
    Lazy(LazyStream),
    Cons(Box<State>, LazyStream),
}

impl Stream {
    pub fn is_empty(&self) -> bool {
        matches!(self, Stream::Empty)
    }

    pub fn unit(u: Box<State>) -> Stream {
        Stream::Unit(u)
    }

    pub fn empty() -> Stream {
        Stream::Empty
    }

    /// A stream from the outcome of a deterministic operation: a unit on
    /// success, empty on logical failure.
    pub fn from_result(r: SResult) -> Stream {
        match r {
            Ok(state) => Stream::unit(Box::new(state)),
            Err(()) => Stream::empty(),
        }
    }

    pub fn cons(a: Box<State>, lazy: LazyStream) -> Stream {
        Stream::Cons(a, lazy)
    }

    pub fn lazy(lazy: LazyStream) -> Stream {
        Stream::Lazy(lazy)
    }

    pub fn mplus(stream: Stream, lazy: LazyStream) -> Stream {
        match stream {
            Stream::Empty => Stream::lazy(lazy),
            Stream::Lazy(lazy_hat) => Stream::lazy_mplus(lazy, lazy_hat),
            Stream::Unit(a) => Stream::cons(a, lazy),
            Stream::Cons(head, lazy_hat) => Stream::cons(head, LazyStream::mplus(lazy, lazy_hat)),
        }
    }

    pub fn bind(stream: Stream, goal: Goal) -> Stream {
        if goal.is_succeed() {
            stream
        } else if goal.is_fail() {
            Stream::empty()
        } else {
            match stream {
                Stream::Empty => Stream::Empty,
                Stream::Lazy(lazy) => Stream::lazy_bind(lazy, goal),
                Stream::Unit(a) => Stream::pause(a, goal),
                Stream::Cons(state, lazy) => Stream::lazy_mplus(
                    LazyStream::pause(state, goal.clone()),
                    LazyStream::bind(lazy, goal),
                ),
            }
        }
    }

    pub fn lazy_mplus(lazy: LazyStream, lazy_hat: LazyStream) -> Stream {
        Stream::Lazy(LazyStream::mplus(lazy, lazy_hat))
    }

    pub fn lazy_bind(lazy: LazyStream, goal: Goal) -> Stream {
        if goal.is_succeed() {
            Stream::lazy(lazy)
        } else if goal.is_fail() {
            Stream::empty()
        } else {
            Stream::Lazy(LazyStream::bind(lazy, goal))
        }
    }

    pub fn pause(state: Box<State>, goal: Goal) -> Stream {
        Stream::Lazy(LazyStream::pause(state, goal))
    }

    pub fn delay(stream: Stream) -> Stream {
        Stream::Lazy(LazyStream::delay(stream))
    }

    /// A mature stream has its head available without further stepping.
    pub fn is_mature(&self) -> bool {
        !matches!(self, Stream::Lazy(_))
    }

    pub fn head(&self) -> Option<&State> {
        match self {
            Stream::Unit(a) | Stream::Cons(a, _) => Some(a),
            _ => None,
        }
    }
}
