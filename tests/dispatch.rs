use attachment_html::{
    Adapter, Attachment, ConversionOptions, ConvertError, Dispatcher, Format,
    adapters::TextAdapter, config::Config,
};

#[test]
fn text_goes_to_the_text_adapter() {
    let attachment = Attachment::new("text/plain", "body.txt", "hereisthetext");
    let dispatcher = Dispatcher::default();
    let expected = TextAdapter::new(&attachment, dispatcher.options())
        .to_html()
        .unwrap();
    assert_eq!(dispatcher.to_html(&attachment).unwrap(), expected);
}

#[test]
fn convert_reports_format_without_success_signal_for_text() {
    let attachment = Attachment::new("text/plain", "body.txt", "hi");
    let result = Dispatcher::default().convert(&attachment).unwrap();
    assert_eq!(result.format, Format::Text);
    assert_eq!(result.success, None);
}

#[test]
fn unknown_content_type_is_unsupported() {
    let attachment = Attachment::new("application/octet-stream", "blob.bin", vec![0u8, 1, 2]);
    let err = Dispatcher::default().to_html(&attachment).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedFormat(ct) if ct == "application/octet-stream"));
}

#[test]
fn rtf_is_not_wired_by_default() {
    let attachment = Attachment::new("application/rtf", "letter.rtf", "{\\rtf1 hi}");
    let dispatcher = Dispatcher::default();
    assert!(matches!(
        dispatcher.lookup(&attachment.content_type),
        Err(ConvertError::UnsupportedFormat(_))
    ));
    assert_eq!(dispatcher.formats().collect::<Vec<_>>(), vec![Format::Text, Format::Pdf]);
}

#[test]
fn rtf_can_be_registered() {
    let mut dispatcher = Dispatcher::new(ConversionOptions::default());
    dispatcher.register(Format::Rtf);
    assert_eq!(dispatcher.lookup("application/rtf").unwrap(), Format::Rtf);
    assert_eq!(dispatcher.lookup("text/rtf").unwrap(), Format::Rtf);

    dispatcher.unregister(Format::Pdf);
    assert!(dispatcher.lookup("application/pdf").is_err());
}

#[test]
fn register_rtf_from_config() {
    let mut cfg = Config::default();
    cfg.dispatch.register_rtf = true;
    let dispatcher = Dispatcher::from_config(&cfg);
    assert!(dispatcher.formats().any(|f| f == Format::Rtf));
}

#[test]
fn content_type_matching_ignores_case_and_parameters() {
    let dispatcher = Dispatcher::default();
    assert_eq!(dispatcher.lookup("text/plain; charset=utf-8").unwrap(), Format::Text);
    assert_eq!(dispatcher.lookup("Application/PDF").unwrap(), Format::Pdf);
}

#[test]
fn options_follow_config() {
    let mut cfg = Config::default();
    cfg.conversion.wrapper_id = "wrap".into();
    cfg.conversion.work_dir = "/var/tmp/attachments".into();
    cfg.pdf.timeout_seconds = 5;
    let options = ConversionOptions::from_config(&cfg);
    assert_eq!(options.wrapper_id, "wrap");
    assert_eq!(options.working_dir, std::path::PathBuf::from("/var/tmp/attachments"));
    assert_eq!(options.pdftohtml.timeout.as_secs(), 5);
    assert_eq!(options.unrtf.timeout.as_secs(), 120);
}

#[test]
fn default_working_dir_is_system_temp() {
    let options = ConversionOptions::from_config(&Config::default());
    assert_eq!(options.working_dir, std::env::temp_dir());
}
