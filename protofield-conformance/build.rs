use protofield_build::descriptor::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, Label, Type,
};

fn scalars() -> FileDescriptorProto {
    FileDescriptorProto::new("protos/scalars.proto")
        .with_package("conformance")
        .with_message(
            DescriptorProto::new("Scalars")
                .with_field(FieldDescriptorProto::new("weight", 1, Type::Float))
                .with_field(FieldDescriptorProto::new("big", 2, Type::Int64))
                .with_field(FieldDescriptorProto::new("ubig", 3, Type::Uint64))
                .with_field(FieldDescriptorProto::new("count", 4, Type::Int32).with_default("-7"))
                .with_field(FieldDescriptorProto::new("ratio", 5, Type::Double).with_default("1.5"))
                .with_field(FieldDescriptorProto::new("checksum", 6, Type::Fixed64))
                .with_field(FieldDescriptorProto::new("crc", 7, Type::Fixed32))
                .with_field(FieldDescriptorProto::new("flag", 8, Type::Bool))
                .with_field(FieldDescriptorProto::new("name", 9, Type::String).with_default("unnamed"))
                .with_field(FieldDescriptorProto::new("data", 10, Type::Bytes).with_default("\\001abc"))
                .with_field(FieldDescriptorProto::new("small", 11, Type::Uint32))
                .with_field(FieldDescriptorProto::new("sf32", 12, Type::Sfixed32))
                .with_field(FieldDescriptorProto::new("sf64", 13, Type::Sfixed64))
                .with_field(FieldDescriptorProto::new("delta", 14, Type::Sint32).with_default("-1"))
                .with_field(FieldDescriptorProto::new("offset", 15, Type::Sint64))
                .with_field(FieldDescriptorProto::new("far", 2000, Type::Int32)),
        )
}

fn envelope() -> FileDescriptorProto {
    let header = DescriptorProto::new("Header")
        .with_field(FieldDescriptorProto::new("title", 1, Type::String))
        .with_field(FieldDescriptorProto::new("priority", 2, Type::Int32))
        .with_field(FieldDescriptorProto::group("meta", 3, "Meta"))
        .with_nested(
            DescriptorProto::new("Meta")
                .with_field(FieldDescriptorProto::new("author", 1, Type::String))
                .with_field(FieldDescriptorProto::new("revision", 2, Type::Uint32)),
        );
    let detail = DescriptorProto::new("Detail")
        .with_field(FieldDescriptorProto::new("note", 1, Type::String))
        .with_field(FieldDescriptorProto::new("score", 2, Type::Double))
        .with_field(FieldDescriptorProto::new("tally", 3, Type::Int32));

    FileDescriptorProto::new("protos/envelope.proto")
        .with_package("conformance")
        .with_message(
            DescriptorProto::new("Envelope")
                .with_field(FieldDescriptorProto::new("id", 1, Type::Int32))
                .with_field(FieldDescriptorProto::new("code", 2, Type::Int32).in_oneof(0))
                .with_field(FieldDescriptorProto::new("text", 3, Type::String).in_oneof(0))
                .with_field(FieldDescriptorProto::new("blob", 4, Type::Bytes).in_oneof(0))
                .with_field(FieldDescriptorProto::group("header", 16, "Header"))
                .with_field(FieldDescriptorProto::group("detail", 17, "Detail").in_oneof(0))
                .with_nested(header)
                .with_nested(detail)
                .with_oneof("body"),
        )
}

fn ticket() -> FileDescriptorProto {
    FileDescriptorProto::new("protos/ticket.proto")
        .with_package("conformance")
        .with_message(
            DescriptorProto::new("Ticket")
                .with_field(FieldDescriptorProto::new("id", 1, Type::Int32).with_label(Label::Required))
                .with_field(FieldDescriptorProto::new("owner", 2, Type::String).with_label(Label::Required))
                .with_field(FieldDescriptorProto::group("info", 3, "Info"))
                .with_nested(
                    DescriptorProto::new("Info")
                        .with_field(
                            FieldDescriptorProto::new("reference", 1, Type::String)
                                .with_label(Label::Required),
                        )
                        .with_field(FieldDescriptorProto::new("note", 2, Type::String)),
                ),
        )
}

/// Names that shadow trait methods or clash with the oneof enums.
fn setting() -> FileDescriptorProto {
    FileDescriptorProto::new("protos/setting.proto")
        .with_package("conformance")
        .with_message(
            DescriptorProto::new("Setting")
                .with_field(FieldDescriptorProto::new("default", 1, Type::Int32))
                .with_field(FieldDescriptorProto::group("inner", 2, "Inner"))
                .with_field(FieldDescriptorProto::new("code", 3, Type::Int32).in_oneof(0))
                .with_field(FieldDescriptorProto::group("payload_group", 4, "Payload").in_oneof(0))
                .with_nested(
                    DescriptorProto::new("Inner")
                        .with_field(FieldDescriptorProto::new("clone", 1, Type::Int32)),
                )
                .with_nested(
                    DescriptorProto::new("Payload")
                        .with_field(FieldDescriptorProto::new("label", 1, Type::String)),
                )
                .with_oneof("payload"),
        )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    protofield_build::compile_files(&[scalars(), envelope(), ticket(), setting()])?;
    Ok(())
}
