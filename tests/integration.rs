// Integration tests module

mod integration {
    mod cli_test;
    mod config_test;
    mod pipeline_test;
    mod render_test;
}
