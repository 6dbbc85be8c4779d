use cookiesync::crypto::fernet::Fernet;
use cookiesync::crypto::kdf::{derive_key, KeyDerivationCache};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_fernet(c: &mut Criterion) {
    let fernet = Fernet::new(&[7u8; 32]);
    let token = fernet.encrypt(b"a typical cookie value").unwrap();

    c.bench_function("fernet_encrypt", |b| {
        b.iter(|| {
            black_box(fernet.encrypt(black_box(b"a typical cookie value")).unwrap());
        })
    });

    c.bench_function("fernet_decrypt", |b| {
        b.iter(|| {
            black_box(fernet.decrypt(black_box(&token)).unwrap());
        })
    });
}

fn benchmark_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");
    group.sample_size(10);
    group.bench_function("pbkdf2_390k_uncached", |b| {
        b.iter(|| {
            black_box(derive_key(b"password", b"0123456789abcdef", 390_000).unwrap());
        })
    });
    group.finish();

    let cache = KeyDerivationCache::new();
    cache.derive(b"0123456789abcdef", 390_000, "password").unwrap();
    c.bench_function("derive_cached", |b| {
        b.iter(|| {
            black_box(
                cache
                    .derive(black_box(b"0123456789abcdef"), 390_000, "password")
                    .unwrap(),
            );
        })
    });
}

criterion_group!(benches, benchmark_fernet, benchmark_derive);
criterion_main!(benches);
