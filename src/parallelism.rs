use crossbeam_channel::TryRecvError;
use log::trace;
use std::thread;

/// Number of jobs per worker thread.
const JOBS_PER_THREAD: usize = 8;

/// A worker-private accumulator that can absorb another one.
///
/// `add` must be commutative and associative, so that the merged result
/// does not depend on how the input was split or scheduled.
pub trait RawResult {
    fn add(&mut self, other: Self);
}

/// Number of worker threads to use.
///
/// `None` means the platform default; anything below 1 becomes 1.
pub fn worker_count(requested: Option<i64>) -> usize {
    match requested {
        None => num_cpus::get().max(1),
        Some(n) if n >= 1 => usize::try_from(n).unwrap_or(usize::MAX),
        Some(_) => 1,
    }
}

fn chunk_size(n: usize, nthreads: usize) -> usize {
    let jobs = nthreads.max(1) * JOBS_PER_THREAD;
    n.div_ceil(jobs).max(1)
}

/// Process `input` in chunks on `nthreads` workers.
///
/// `runner` gets an input chunk together with the output chunk at the same
/// positions, and the worker's own accumulator. Every position is handled by
/// exactly one job. Accumulators are merged on the calling thread after the
/// workers report back.
pub fn compute_parallel<TIn, TOut, TRawResult, TBuilder, TRunner>(
    builder: TBuilder,
    runner: TRunner,
    input: &[TIn],
    output: &mut [TOut],
    nthreads: usize,
) -> TRawResult
where
    TIn: Sync,
    TOut: Send,
    TRawResult: RawResult + Send,
    TBuilder: Fn() -> TRawResult + Send + Copy,
    TRunner: Fn(&[TIn], &mut [TOut], &mut TRawResult) + Send + Copy,
{
    assert_eq!(input.len(), output.len());
    let nthreads = nthreads.max(1);
    let size = chunk_size(input.len(), nthreads);
    let (s1, r1) = crossbeam_channel::unbounded();
    let mut jobs = 0;
    for job in input.chunks(size).zip(output.chunks_mut(size)) {
        s1.send(job).expect("receiver is alive");
        jobs += 1;
    }
    drop(s1);
    let mut total = builder();
    trace!(target: "hazardmap", "{} rows, {jobs} jobs of {size}, {nthreads} threads", input.len());
    thread::scope(|scope| {
        let (s2, r2) = crossbeam_channel::unbounded();
        for _ in 0..nthreads {
            let r1 = r1.clone();
            let s2 = s2.clone();
            scope.spawn(move || {
                let mut thread_total = builder();
                loop {
                    match r1.try_recv() {
                        Ok((inp, out)) => {
                            runner(inp, out, &mut thread_total);
                        }
                        Err(TryRecvError::Empty) => unreachable!(),
                        Err(TryRecvError::Disconnected) => break,
                    }
                }
                s2.send(thread_total).expect("receiver is alive");
            });
        }
        drop(s2);
        while let Ok(thread_total) = r2.recv() {
            total.add(thread_total);
        }
    });
    total
}

#[cfg(test)]
mod test {
    use super::*;

    struct Sum(u64);

    impl RawResult for Sum {
        fn add(&mut self, other: Self) {
            self.0 += other.0;
        }
    }

    fn square_all(input: &[u64], nthreads: usize) -> (Vec<u64>, u64) {
        let mut output = vec![0; input.len()];
        let total = compute_parallel(
            || Sum(0),
            |inp: &[u64], out: &mut [u64], acc: &mut Sum| {
                for (x, y) in inp.iter().zip(out.iter_mut()) {
                    *y = x * x;
                    acc.0 += x;
                }
            },
            input,
            &mut output,
            nthreads,
        );
        (output, total.0)
    }

    #[test]
    fn positions_and_totals() {
        let input = (0..1001).collect::<Vec<u64>>();
        let expected = input.iter().map(|x| x * x).collect::<Vec<u64>>();
        for nthreads in [1, 2, 3, 7, 64] {
            let (output, total) = square_all(&input, nthreads);
            assert_eq!(output, expected);
            assert_eq!(total, 1000 * 1001 / 2);
        }
    }

    #[test]
    fn empty_input() {
        let (output, total) = square_all(&[], 4);
        assert!(output.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn more_threads_than_rows() {
        let (output, total) = square_all(&[3, 4], 16);
        assert_eq!(output, [9, 16]);
        assert_eq!(total, 7);
    }

    #[test]
    fn chunking() {
        assert_eq!(chunk_size(0, 4), 1);
        assert_eq!(chunk_size(10, 4), 1);
        assert_eq!(chunk_size(33, 4), 2);
        assert_eq!(chunk_size(3200, 4), 100);
        assert_eq!(chunk_size(3201, 4), 101);
    }

    #[test]
    fn worker_counts() {
        assert_eq!(worker_count(Some(3)), 3);
        assert_eq!(worker_count(Some(0)), 1);
        assert_eq!(worker_count(Some(-5)), 1);
        assert!(worker_count(None) >= 1);
    }
}
