use crate::context::Context;
use crate::goal::Goal;
use crate::state::State;
use crate::stream::{Lazy, LazyStream, Stream};

/// Drives goal streams to maturity.
///
/// The solver is the only place where lazy stream nodes are forced, which
/// makes its `next` loop the suspension point of the relational engine:
/// cancellation and deadlines are observed here, between stream steps.
pub struct Solver {
    context: Context,
}

impl Solver {
    pub fn new(context: Context) -> Solver {
        Solver { context }
    }

    pub fn start(&self, goal: &Goal, initial_state: State) -> Stream {
        goal.solve(self, initial_state)
    }

    fn step(&self, lazy: Lazy) -> Stream {
        match lazy {
            Lazy::Pause(state, goal) => goal.solve(self, *state),
            Lazy::MPlus(s1, s2) => {
                let stream = self.step(*s1.0);
                Stream::mplus(stream, s2)
            }
            Lazy::Bind(s, goal) => {
                let stream = self.step(*s.0);
                Stream::bind(stream, goal)
            }
            Lazy::Delay(stream) => stream,
        }
    }

    pub fn next(&self, stream: &mut Stream) -> Option<Box<State>> {
        loop {
            if self.context.is_cancelled() {
                *stream = Stream::Empty;
                return None;
            }
            match std::mem::replace(stream, Stream::Empty) {
                Stream::Empty => return None,
                Stream::Unit(state) => return Some(state),
                Stream::Lazy(LazyStream(lazy)) => *stream = self.step(*lazy),
                Stream::Cons(state, lazy_stream) => {
                    *stream = Stream::Lazy(lazy_stream);
                    return Some(state);
                }
            }
        }
    }

    /// Returns a reference to next element in the stream, if any.
    pub fn peek<'a>(&self, stream: &'a mut Stream) -> Option<&'a State> {
        loop {
            match stream {
                Stream::Lazy(_) => {
                    if self.context.is_cancelled() {
                        *stream = Stream::Empty;
                        return None;
                    }
                    if let Stream::Lazy(LazyStream(lazy)) = std::mem::replace(stream, Stream::Empty)
                    {
                        *stream = self.step(*lazy);
                    }
                }
                _ => return stream.head(),
            }
        }
    }

    /// Truncates the stream leaving at most one element, and returns a reference to
    /// the remaining element if any.
    pub fn trunc<'a>(&self, stream: &'a mut Stream) -> Option<&'a State> {
        loop {
            if self.context.is_cancelled() {
                *stream = Stream::Empty;
                return None;
            }
            match std::mem::replace(stream, Stream::Empty) {
                Stream::Empty => return None,
                Stream::Lazy(LazyStream(lazy)) => {
                    *stream = self.step(*lazy);
                }
                Stream::Unit(a) | Stream::Cons(a, _) => {
                    *stream = Stream::Unit(a);
                    return stream.head();
                }
            }
        }
    }

    /// Takes up to `n` states from the stream; `n == 0` drains it.
    pub fn take(&self, stream: &mut Stream, n: usize) -> Vec<Box<State>> {
        let mut states = vec![];
        while n == 0 || states.len() < n {
            match self.next(stream) {
                Some(state) => states.push(state),
                None => break,
            }
        }
        states
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}
