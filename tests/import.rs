use std::io::Write;

use rustdataset::{
    read_csv, read_csv_with_schema, CsvOptions, DataError, DataResult, Importer, Kind, Schema,
    Variable,
};
use tempfile::NamedTempFile;

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temporary file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temporary file");
    file
}

#[test]
fn import_infers_small_file() -> DataResult<()> {
    let file = csv_file("a,b\n1,x\n2,yy\n3,z\n");
    let dataset = read_csv(file.path())?;

    let a = dataset.schema().lookup("a").unwrap();
    assert_eq!(a.kind(), Kind::Quantitative);
    assert_eq!(a.width(), 8);
    assert_eq!(a.offset(), 0);
    let b = dataset.schema().lookup("b").unwrap();
    assert_eq!(b.kind(), Kind::Categorical);
    assert_eq!(b.width(), 3);
    assert_eq!(b.offset(), 8);

    assert_eq!(dataset.row_count(), 3);
    assert_eq!(dataset.field_as::<f64>(2, "a")?, 3.0);
    assert_eq!(dataset.field_text(1, "b")?, "yy");
    Ok(())
}

#[test]
fn import_demotes_column_after_numeric_rows() -> DataResult<()> {
    let file = csv_file("code\n1\n2\nabc\n");
    let dataset = read_csv(file.path())?;

    let code = dataset.schema().lookup("code").unwrap();
    assert_eq!(code.kind(), Kind::Categorical);
    assert!(code.width() >= 4);
    assert_eq!(dataset.field_text(0, "code")?, "1");
    assert_eq!(dataset.field_text(2, "code")?, "abc");
    Ok(())
}

#[test]
fn import_demotion_recomputes_width_over_all_rows() -> DataResult<()> {
    let file = csv_file("id,label\n12345,hello\nx,hi\n7,ok\n");
    let schema = Importer::<f64>::default().infer_schema(file.path())?;

    let id = schema.lookup("id").unwrap();
    assert_eq!(id.kind(), Kind::Categorical);
    assert_eq!(id.width(), 6);
    let label = schema.lookup("label").unwrap();
    assert_eq!(label.kind(), Kind::Categorical);
    assert_eq!(label.width(), 6);
    assert_eq!(label.offset(), 6);
    Ok(())
}

#[test]
fn import_text_first_stays_categorical() -> DataResult<()> {
    let file = csv_file("v\nabc\n1\n22\n");
    let schema = Importer::<f64>::default().infer_schema(file.path())?;
    let v = schema.lookup("v").unwrap();
    assert_eq!(v.kind(), Kind::Categorical);
    assert_eq!(v.width(), 4);
    Ok(())
}

#[test]
fn import_inference_is_idempotent() -> DataResult<()> {
    let file = csv_file("x,y,z\n1.5,a,3\n2,bb,q\n-4,ccc,5\n");
    let importer = Importer::<f64>::default();
    let first = importer.infer_schema(file.path())?;
    let second = importer.infer_schema(file.path())?;
    assert_eq!(first, second);
    assert_eq!(first.lookup("x").unwrap().kind(), Kind::Quantitative);
    assert_eq!(first.lookup("z").unwrap().kind(), Kind::Categorical);
    Ok(())
}

#[test]
fn import_integer_quantity_rejects_reals() -> DataResult<()> {
    let file = csv_file("count,ratio\n1,0.5\n2,1\n");
    let dataset = Importer::<i64>::default().read_inferred(file.path())?;
    assert_eq!(dataset.schema().lookup("count").unwrap().kind(), Kind::Quantitative);
    assert_eq!(dataset.schema().lookup("ratio").unwrap().kind(), Kind::Categorical);
    assert_eq!(dataset.field_as::<i64>(1, "count")?, 2);
    assert_eq!(dataset.field_text(0, "ratio")?, "0.5");
    Ok(())
}

#[test]
fn import_without_data_rows_is_undetermined() {
    let file = csv_file("a,b\n");
    let result = read_csv(file.path());
    assert!(matches!(result, Err(DataError::UndeterminedSchema(name)) if name == "a"));
}

#[test]
fn import_empty_file_has_no_schema() {
    let file = csv_file("");
    assert!(matches!(read_csv(file.path()), Err(DataError::InvalidSchema(_))));
}

#[test]
fn import_inference_checks_field_counts() {
    let file = csv_file("a,b\n1,2\n3\n");
    assert!(matches!(
        read_csv(file.path()),
        Err(DataError::MalformedRecord { line: 3, .. })
    ));
}

#[test]
fn import_missing_file_is_io_error() {
    let result = read_csv("/nonexistent/definitely/missing.csv");
    assert!(matches!(result, Err(DataError::Io(_))));
}

#[test]
fn import_with_schema_fast_path() -> DataResult<()> {
    let schema = Schema::new(vec![
        Variable::categorical("name", 8),
        Variable::quantitative::<f64>("score"),
    ])?;
    let file = csv_file("name,score\nann,1.25\n\nbo, 7\n");
    let dataset = read_csv_with_schema(file.path(), schema.clone())?;
    assert_eq!(dataset.schema(), &schema);
    assert_eq!(dataset.row_count(), 2);
    assert_eq!(dataset.field_text(1, "name")?, "bo");
    assert_eq!(dataset.field_as::<f64>(0, "score")?, 1.25);
    assert_eq!(dataset.field_as::<f64>(1, "score")?, 7.0);
    Ok(())
}

#[test]
fn import_with_schema_field_count_errors() -> DataResult<()> {
    let schema = Schema::new(vec![
        Variable::quantitative::<f64>("a"),
        Variable::categorical("b", 4),
    ])?;

    let too_many = csv_file("a,b\n1,x\n2,y,extra\n");
    let err = read_csv_with_schema(too_many.path(), schema.clone()).unwrap_err();
    match err {
        DataError::MalformedRecord { line, reason } => {
            assert_eq!(line, 3);
            assert!(reason.contains("too many"));
        }
        other => panic!("unexpected error: {}", other),
    }

    let too_few = csv_file("a,b\n1\n");
    let err = read_csv_with_schema(too_few.path(), schema).unwrap_err();
    assert!(matches!(err, DataError::MalformedRecord { ref reason, .. } if reason.contains("too few")));
    Ok(())
}

#[test]
fn import_with_schema_value_errors() -> DataResult<()> {
    let schema = Schema::new(vec![
        Variable::quantitative::<f64>("a"),
        Variable::categorical("b", 3),
    ])?;

    let not_numeric = csv_file("a,b\nx,ok\n");
    assert!(matches!(
        read_csv_with_schema(not_numeric.path(), schema.clone()),
        Err(DataError::MalformedRecord { line: 2, .. })
    ));

    let too_long = csv_file("a,b\n1,abcd\n");
    assert!(matches!(
        read_csv_with_schema(too_long.path(), schema.clone()),
        Err(DataError::FieldTooLong { len: 4, width: 3, .. })
    ));

    let exact = csv_file("a,b\n1,abc\n");
    let dataset = read_csv_with_schema(exact.path(), schema.clone())?;
    assert_eq!(dataset.field_text(0, "b")?, "abc");

    let narrow = csv_file("a,b\n1,ab\n");
    assert!(matches!(
        Importer::<f32>::default().read_with_schema(narrow.path(), schema),
        Err(DataError::SizeMismatch { expected: 8, found: 4, .. })
    ));
    Ok(())
}

#[test]
fn import_from_reader_without_header() -> DataResult<()> {
    let schema = Schema::new(vec![
        Variable::quantitative::<i32>("n"),
        Variable::categorical("tag", 4),
    ])?;
    let options = CsvOptions {
        delimiter: ';',
        has_header: false,
    };
    let dataset = Importer::<i32>::new(options).read_from("1;a\n2;b\n".as_bytes(), schema)?;
    assert_eq!(dataset.row_count(), 2);
    assert_eq!(dataset.field_as::<i32>(0, "n")?, 1);
    assert_eq!(dataset.field_text(1, "tag")?, "b");
    Ok(())
}

#[test]
fn import_infers_generated_names_without_header() -> DataResult<()> {
    let file = csv_file("1\tred\n2\tblue\n");
    let options = CsvOptions {
        delimiter: '\t',
        has_header: false,
    };
    let dataset = Importer::<f64>::new(options).read_inferred(file.path())?;
    assert_eq!(dataset.column_names(), vec!["column_1", "column_2"]);
    assert_eq!(dataset.row_count(), 2);
    assert_eq!(dataset.schema().lookup("column_2").unwrap().width(), 5);
    Ok(())
}

#[test]
fn import_out_of_range_integer_demotes_column() -> DataResult<()> {
    let file = csv_file("n\n1\n3000000000\n");
    let dataset = Importer::<i32>::default().read_inferred(file.path())?;
    let n = dataset.schema().lookup("n").unwrap();
    assert_eq!(n.kind(), Kind::Categorical);
    assert_eq!(n.width(), 11);
    assert_eq!(dataset.field_text(1, "n")?, "3000000000");

    let wide = Importer::<i64>::default().read_inferred(file.path())?;
    assert_eq!(wide.schema().lookup("n").unwrap().kind(), Kind::Quantitative);
    assert_eq!(wide.field_as::<i64>(1, "n")?, 3_000_000_000);
    Ok(())
}

#[test]
fn import_signed_numbers_stay_quantitative() -> DataResult<()> {
    let file = csv_file("x\n-3\n2\n+4.5\n");
    let dataset = read_csv(file.path())?;
    assert_eq!(dataset.schema().lookup("x").unwrap().kind(), Kind::Quantitative);
    assert_eq!(dataset.field_as::<f64>(0, "x")?, -3.0);
    assert_eq!(dataset.field_as::<f64>(2, "x")?, 4.5);
    Ok(())
}
