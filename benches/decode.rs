//! Benchmarks for metadata parsing and attribute decoding.
//!
//! The images are synthetic: many types, each with a documentation link and a GUID,
//! which is the attribute mix dominating `Windows.Win32.winmd`.

extern crate winmdscope;

#[allow(dead_code)]
#[path = "../src/test/image.rs"]
mod image;

use criterion::{criterion_group, criterion_main, Criterion};
use image::{
    ImageBuilder, Owner, ValueBlob, ELEMENT_TYPE_STRING, ELEMENT_TYPE_U1, ELEMENT_TYPE_U2,
    ELEMENT_TYPE_U4,
};
use std::hint::black_box;
use winmdscope::{
    metadata::{
        customattributes::{CustomAttributeDecoder, TypeCustomAttributeData},
        view::MetadataView,
    },
    Parser,
};

const TYPES: u32 = 500;

fn image() -> Vec<u8> {
    let mut builder = ImageBuilder::new();
    let documentation = builder.metadata_ctor("DocumentationAttribute", &[&[ELEMENT_TYPE_STRING]]);
    let guid = builder.metadata_ctor(
        "GuidAttribute",
        &[
            &[ELEMENT_TYPE_U4],
            &[ELEMENT_TYPE_U2],
            &[ELEMENT_TYPE_U2],
            &[ELEMENT_TYPE_U1],
            &[ELEMENT_TYPE_U1],
            &[ELEMENT_TYPE_U1],
            &[ELEMENT_TYPE_U1],
            &[ELEMENT_TYPE_U1],
            &[ELEMENT_TYPE_U1],
            &[ELEMENT_TYPE_U1],
            &[ELEMENT_TYPE_U1],
        ],
    );

    for index in 0..TYPES {
        let row = builder.type_def(0x00A1, "Windows.Win32.Bench", &format!("IType{index}"), None);
        builder.custom_attribute(
            Owner::TypeDef(row),
            documentation,
            &ValueBlob::new()
                .string(Some(&format!("https://learn.microsoft.com/itype{index}")))
                .finish(),
        );
        builder.custom_attribute(
            Owner::TypeDef(row),
            guid,
            &ValueBlob::new()
                .u32(index)
                .u16(1)
                .u16(2)
                .raw(&[3, 4, 5, 6, 7, 8, 9, 10])
                .finish(),
        );
    }

    builder.build()
}

/// Benchmark parsing the root, the heaps and the table stream header.
fn bench_parse_view(c: &mut Criterion) {
    let data = image();

    c.bench_function("parse_view", |b| {
        b.iter(|| {
            let view = MetadataView::parse(black_box(&data)).unwrap();
            black_box(view.row_count(winmdscope::metadata::tables::TableId::TypeDef))
        });
    });
}

/// Benchmark decoding the attributes of every type, one row at a time.
fn bench_type_attributes(c: &mut Criterion) {
    let data = image();
    let view = MetadataView::parse(&data).unwrap();
    let decoder = CustomAttributeDecoder::new(&view).unwrap();

    c.bench_function("type_attributes_sequential", |b| {
        b.iter(|| {
            for row in 0..TYPES {
                black_box(decoder.type_def_attributes(black_box(row)).unwrap());
            }
        });
    });
}

/// Benchmark decoding the attributes of every type on the rayon pool.
fn bench_type_attributes_parallel(c: &mut Criterion) {
    let data = image();
    let view = MetadataView::parse(&data).unwrap();
    let decoder = CustomAttributeDecoder::new(&view).unwrap();

    c.bench_function("type_attributes_parallel", |b| {
        b.iter(|| black_box(decoder.decode_all::<TypeCustomAttributeData>().unwrap()));
    });
}

/// Benchmark the compressed integer decoder on a mix of all three widths.
fn bench_compressed_uint(c: &mut Criterion) {
    let mut data = Vec::new();
    for _ in 0..256 {
        data.extend([0x03, 0xAE, 0x57, 0xC0, 0x00, 0x40, 0x00]);
    }

    c.bench_function("compressed_uint", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(&data));
            while parser.has_more_data() {
                black_box(parser.read_compressed_uint().unwrap());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_parse_view,
    bench_type_attributes,
    bench_type_attributes_parallel,
    bench_compressed_uint
);
criterion_main!(benches);
