use criterion::Criterion;

#[cfg(not(feature = "cpb"))]
pub type Measurement = criterion::measurement::WallTime;

#[cfg(feature = "cpb")]
pub type Measurement = criterion_cycles_per_byte::CyclesPerByte;

pub type Benchmarker = Criterion<Measurement>;

#[cfg(not(feature = "cpb"))]
pub fn config() -> Benchmarker {
    Criterion::default()
}

#[cfg(feature = "cpb")]
pub fn config() -> Benchmarker {
    Criterion::default().with_measurement(criterion_cycles_per_byte::CyclesPerByte)
}
