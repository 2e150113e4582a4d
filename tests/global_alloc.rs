// Everything in this test binary, the test harness included, allocates
// through mapalloc.
use mapalloc::MapAlloc;
use std::collections::HashMap;

#[global_allocator]
static GLOBAL: MapAlloc = MapAlloc::new();

#[repr(align(64))]
struct CacheLine([u8; 64]);

#[repr(align(4096))]
struct Page([u8; 4096]);

#[test]
fn vec_growth() {
    let mut v = Vec::new();

    for i in 0..100_000u32 {
        v.push(i);
    }

    assert!(v.iter().enumerate().all(|(i, x)| i as u32 == *x));

    v.truncate(10);
    v.shrink_to_fit();
    assert_eq!(v, (0..10).collect::<Vec<_>>());
}

#[test]
fn strings_and_maps() {
    let mut map = HashMap::new();

    for i in 0..1000 {
        map.insert(format!("key-{i}"), i.to_string().repeat(i % 7 + 1));
    }

    assert_eq!(map["key-45"], "45454545");
    assert_eq!(map.len(), 1000);
}

#[test]
fn over_aligned_boxes() {
    let line = Box::new(CacheLine([3; 64]));
    let page = Box::new(Page([9; 4096]));

    assert_eq!(&*line as *const CacheLine as usize % 64, 0);
    assert_eq!(&*page as *const Page as usize % 4096, 0);
    assert!(line.0.iter().all(|b| *b == 3));
    assert!(page.0.iter().all(|b| *b == 9));
}

#[test]
fn over_aligned_vec_realloc() {
    let mut lines = Vec::new();

    for i in 0..500 {
        lines.push(CacheLine([i as u8; 64]));
        assert_eq!(lines.as_ptr() as usize % 64, 0);
    }

    assert!(lines.iter().enumerate().all(|(i, l)| l.0[63] == i as u8));
}

#[test]
fn zeroed_vec() {
    let v = vec![0u64; 1 << 16];

    assert!(v.iter().all(|x| *x == 0));
}

#[test]
fn threads_allocate_through_global() {
    let handles: Vec<_> = (0..4)
        .map(|t| {
            std::thread::spawn(move || {
                let data: Vec<String> = (0..1000).map(|i| format!("{t}:{i}")).collect();

                data.join(",").len()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap() > 0);
    }
}
