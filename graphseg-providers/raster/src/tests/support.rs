use std::convert::TryFrom;
use std::sync::Arc;

use arrow_array::{ArrayRef, FixedSizeListArray, Float32Array, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use bytes::Bytes;
use parquet::arrow::arrow_writer::ArrowWriter;

pub(crate) const COLUMN: &str = "pixels";

pub(crate) fn build_list_array(
    pixels: &[Vec<f32>],
    bands: usize,
    child_nullable: bool,
) -> FixedSizeListArray {
    assert!(pixels.iter().all(|pixel| pixel.len() == bands));
    let values = Float32Array::from_iter_values(pixels.iter().flatten().copied());
    FixedSizeListArray::new(
        Arc::new(Field::new("item", DataType::Float32, child_nullable)),
        i32::try_from(bands).expect("band count fits in i32"),
        Arc::new(values) as ArrayRef,
        None,
    )
}

pub(crate) fn pixel_field(bands: usize, child_nullable: bool, list_nullable: bool) -> Field {
    Field::new(
        COLUMN,
        DataType::FixedSizeList(
            Arc::new(Field::new("item", DataType::Float32, child_nullable)),
            i32::try_from(bands).expect("band count fits in i32"),
        ),
        list_nullable,
    )
}

pub(crate) fn batch(pixels: &[Vec<f32>], bands: usize) -> RecordBatch {
    let array = build_list_array(pixels, bands, false);
    RecordBatch::try_new(
        Arc::new(Schema::new(vec![pixel_field(bands, false, false)])),
        vec![Arc::new(array) as ArrayRef],
    )
    .expect("batch")
}

pub(crate) fn write_batches(batches: &[RecordBatch]) -> Bytes {
    let schema = batches.first().expect("at least one batch").schema();
    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).expect("writer");
        for batch in batches {
            writer.write(batch).expect("write");
        }
        writer.close().expect("close");
    }
    Bytes::from(buffer)
}

pub(crate) fn write_parquet(pixels: &[Vec<f32>], bands: usize) -> Bytes {
    write_batches(&[batch(pixels, bands)])
}

pub(crate) fn write_parquet_with_field(field: Field, array: FixedSizeListArray) -> Bytes {
    let schema = Arc::new(Schema::new(vec![field]));
    let batch = RecordBatch::try_new(schema, vec![Arc::new(array) as ArrayRef]).expect("batch");
    write_batches(&[batch])
}
